use crate::month::Month;
use crate::user_repo::UserId;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// At most one budget exists per `(user, category, month)`; writes for an
/// existing key replace the amount in place.
#[async_trait]
pub trait BudgetRepo: Sync + Send {
    /// Budgets for the user in the given month, ordered by category.
    async fn get_budgets(&self, user: UserId, month: Month) -> Result<Vec<Budget>, BudgetRepoError>;

    /// Inserts or replaces the amount for `(user, category, month)` as a
    /// single atomic write, then returns the full budget set for that
    /// user and month so callers can refresh their view in one round trip.
    async fn set_budget(
        &self,
        user: UserId,
        new_budget: NewBudget,
    ) -> Result<Vec<Budget>, BudgetRepoError>;
}

#[derive(Error, Debug)]
pub enum BudgetRepoError {
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub amount: Decimal,
    pub month: Month,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewBudget {
    pub category: String,
    pub amount: Decimal,
    pub month: Month,
}
