use super::{from_cents, to_cents};
use crate::month::Month;
use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    CategoryTotal, MonthTotals, NewTransaction, Transaction, TransactionKind, TransactionRepo,
    TransactionRepoError,
};
use crate::user_repo::UserId;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::instrument;

const TRANSACTION_COLUMNS: &str = "id, amount_cents, category, description, kind, date, created_at";

pub struct SqlxTransactionRepo {
    pool: SqlitePool,
}

impl SqlxTransactionRepo {
    pub fn new(pool: SqlitePool) -> SqlxTransactionRepo {
        SqlxTransactionRepo { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TransactionEntry {
    id: i64,
    amount_cents: i64,
    category: String,
    description: String,
    kind: String,
    date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionEntry> for Transaction {
    type Error = anyhow::Error;

    fn try_from(entry: TransactionEntry) -> Result<Transaction, anyhow::Error> {
        let kind = TransactionKind::from_str(&entry.kind)?;
        Ok(Transaction {
            id: entry.id,
            amount: from_cents(entry.amount_cents),
            category: entry.category,
            description: entry.description,
            kind,
            date: entry.date,
            created_at: entry.created_at,
        })
    }
}

#[async_trait]
impl TransactionRepo for SqlxTransactionRepo {
    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        user: UserId,
        transaction_id: i64,
    ) -> Result<Transaction, TransactionRepoError> {
        let entry: Option<TransactionEntry> = sqlx::query_as(&format!(
            "SELECT {} FROM transactions WHERE id = ? AND user_id = ?",
            TRANSACTION_COLUMNS
        ))
        .bind(transaction_id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get transaction {}", transaction_id))?;

        let entry = entry.ok_or(TransactionNotFound(transaction_id))?;
        entry.try_into().map_err(TransactionRepoError::Other)
    }

    #[instrument(skip(self))]
    async fn get_all_transactions(
        &self,
        user: UserId,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let entries: Vec<TransactionEntry> = sqlx::query_as(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY date DESC, created_at DESC, id DESC",
            TRANSACTION_COLUMNS
        ))
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get transactions for user {}", user))?;

        entries
            .into_iter()
            .map(|entry| entry.try_into().map_err(TransactionRepoError::Other))
            .collect()
    }

    #[instrument(skip(self, new_transaction))]
    async fn create_new_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let amount_cents = to_cents(new_transaction.amount)?;
        let created_at = Utc::now();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions (user_id, amount_cents, category, description, kind, date, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(user)
        .bind(amount_cents)
        .bind(&new_transaction.category)
        .bind(&new_transaction.description)
        .bind(new_transaction.kind.as_str())
        .bind(new_transaction.date)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert transaction")?;

        Ok(Transaction {
            id,
            amount: from_cents(amount_cents),
            category: new_transaction.category,
            description: new_transaction.description,
            kind: new_transaction.kind,
            date: new_transaction.date,
            created_at,
        })
    }

    #[instrument(skip(self, updated_transaction))]
    async fn update_transaction(
        &self,
        user: UserId,
        transaction_id: i64,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let amount_cents = to_cents(updated_transaction.amount)?;

        let result = sqlx::query(
            "UPDATE transactions SET amount_cents = ?, category = ?, description = ?, kind = ?, date = ? \
             WHERE id = ? AND user_id = ?",
        )
        .bind(amount_cents)
        .bind(&updated_transaction.category)
        .bind(&updated_transaction.description)
        .bind(updated_transaction.kind.as_str())
        .bind(updated_transaction.date)
        .bind(transaction_id)
        .bind(user)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Unable to update transaction {}", transaction_id))?;

        if result.rows_affected() == 0 {
            return Err(TransactionNotFound(transaction_id));
        }

        // re-read to return the row with its original creation time
        self.get_transaction(user, transaction_id).await
    }

    #[instrument(skip(self))]
    async fn delete_transaction(
        &self,
        user: UserId,
        transaction_id: i64,
    ) -> Result<Transaction, TransactionRepoError> {
        let entry: Option<TransactionEntry> = sqlx::query_as(&format!(
            "DELETE FROM transactions WHERE id = ? AND user_id = ? RETURNING {}",
            TRANSACTION_COLUMNS
        ))
        .bind(transaction_id)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete transaction {}", transaction_id))?;

        let entry = entry.ok_or(TransactionNotFound(transaction_id))?;
        entry.try_into().map_err(TransactionRepoError::Other)
    }

    #[instrument(skip(self))]
    async fn month_totals(
        &self,
        user: UserId,
        month: Month,
    ) -> Result<MonthTotals, TransactionRepoError> {
        let (start, end) = month.date_range();
        let (income, expense): (Option<i64>, Option<i64>) = sqlx::query_as(
            "SELECT SUM(amount_cents) FILTER (WHERE kind = 'income'), \
                    SUM(amount_cents) FILTER (WHERE kind = 'expense') \
             FROM transactions WHERE user_id = ? AND date >= ? AND date < ?",
        )
        .bind(user)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Unable to get {} totals for user {}", month, user))?;

        Ok(MonthTotals {
            income: from_cents(income.unwrap_or(0)),
            expense: from_cents(expense.unwrap_or(0)),
        })
    }

    #[instrument(skip(self))]
    async fn expense_breakdown(
        &self,
        user: UserId,
        month: Month,
    ) -> Result<Vec<CategoryTotal>, TransactionRepoError> {
        let (start, end) = month.date_range();
        let totals: Vec<(String, i64)> = sqlx::query_as(
            "SELECT category, SUM(amount_cents) AS total \
             FROM transactions WHERE user_id = ? AND kind = 'expense' AND date >= ? AND date < ? \
             GROUP BY category ORDER BY total DESC, category ASC",
        )
        .bind(user)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get {} expense breakdown for user {}", month, user))?;

        Ok(totals
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category,
                amount: from_cents(total),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn balance(&self, user: UserId) -> Result<Decimal, TransactionRepoError> {
        let balance: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(CASE WHEN kind = 'income' THEN amount_cents ELSE -amount_cents END) \
             FROM transactions WHERE user_id = ?",
        )
        .bind(user)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Unable to get balance for user {}", user))?;

        Ok(from_cents(balance.unwrap_or(0)))
    }
}
