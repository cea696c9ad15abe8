use super::{from_cents, to_cents};
use crate::budget_repo::{Budget, BudgetRepo, BudgetRepoError, NewBudget};
use crate::month::Month;
use crate::user_repo::UserId;
use anyhow::Context;
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::instrument;

pub struct SqlxBudgetRepo {
    pool: SqlitePool,
}

impl SqlxBudgetRepo {
    pub fn new(pool: SqlitePool) -> SqlxBudgetRepo {
        SqlxBudgetRepo { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BudgetEntry {
    id: i64,
    category: String,
    amount_cents: i64,
    month: String,
}

impl TryFrom<BudgetEntry> for Budget {
    type Error = anyhow::Error;

    fn try_from(entry: BudgetEntry) -> Result<Budget, anyhow::Error> {
        let month = Month::from_str(&entry.month)?;
        Ok(Budget {
            id: entry.id,
            category: entry.category,
            amount: from_cents(entry.amount_cents),
            month,
        })
    }
}

#[async_trait]
impl BudgetRepo for SqlxBudgetRepo {
    #[instrument(skip(self))]
    async fn get_budgets(&self, user: UserId, month: Month) -> Result<Vec<Budget>, BudgetRepoError> {
        let entries: Vec<BudgetEntry> = sqlx::query_as(
            "SELECT id, category, amount_cents, month FROM budgets \
             WHERE user_id = ? AND month = ? ORDER BY category",
        )
        .bind(user)
        .bind(month.to_string())
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get {} budgets for user {}", month, user))?;

        entries
            .into_iter()
            .map(|entry| entry.try_into().map_err(BudgetRepoError::Other))
            .collect()
    }

    #[instrument(skip(self, new_budget))]
    async fn set_budget(
        &self,
        user: UserId,
        new_budget: NewBudget,
    ) -> Result<Vec<Budget>, BudgetRepoError> {
        let amount_cents = to_cents(new_budget.amount)?;

        // the unique key makes concurrent writes for the same
        // (user, category, month) collapse into one row
        sqlx::query(
            "INSERT INTO budgets (user_id, category, amount_cents, month) VALUES (?, ?, ?, ?) \
             ON CONFLICT (user_id, category, month) DO UPDATE SET amount_cents = excluded.amount_cents",
        )
        .bind(user)
        .bind(&new_budget.category)
        .bind(amount_cents)
        .bind(new_budget.month.to_string())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Unable to upsert budget for user {}", user))?;

        self.get_budgets(user, new_budget.month).await
    }
}
