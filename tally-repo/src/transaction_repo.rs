use crate::month::Month;
use crate::user_repo::UserId;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Every operation is scoped to the owning user; a transaction id belonging
/// to another user behaves exactly like a missing id.
#[async_trait]
pub trait TransactionRepo: Sync + Send {
    async fn get_transaction(
        &self,
        user: UserId,
        transaction_id: i64,
    ) -> Result<Transaction, TransactionRepoError>;

    /// All transactions for the user, most recent activity first: date
    /// descending, then creation time descending, then id descending.
    async fn get_all_transactions(
        &self,
        user: UserId,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    async fn create_new_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn update_transaction(
        &self,
        user: UserId,
        transaction_id: i64,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn delete_transaction(
        &self,
        user: UserId,
        transaction_id: i64,
    ) -> Result<Transaction, TransactionRepoError>;

    /// Income and expense totals within the month. Months with no rows of a
    /// kind report zero for that kind.
    async fn month_totals(
        &self,
        user: UserId,
        month: Month,
    ) -> Result<MonthTotals, TransactionRepoError>;

    /// Expense totals per category within the month, largest first.
    async fn expense_breakdown(
        &self,
        user: UserId,
        month: Month,
    ) -> Result<Vec<CategoryTotal>, TransactionRepoError>;

    /// All-time income minus all-time expense.
    async fn balance(&self, user: UserId) -> Result<Decimal, TransactionRepoError>;
}

#[derive(Error, Debug)]
pub enum TransactionRepoError {
    #[error("Transaction with id {0} not found")]
    TransactionNotFound(i64),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown transaction kind {0:?}")]
pub struct ParseKindError(String);

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<TransactionKind, ParseKindError> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(ParseKindError(s.to_owned())),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Transaction {
    pub id: i64,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let ordering = self
            .date
            .cmp(&other.date)
            .then(self.created_at.cmp(&other.created_at))
            .then(self.id.cmp(&other.id));
        Some(ordering)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub category: String,
    /// Defaults to an empty string when the caller omits it.
    #[serde(default)]
    pub description: String,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn into_transaction(self, id: i64, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            category: self.category,
            description: self.description,
            kind: self.kind,
            date: self.date,
            created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct MonthTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}
