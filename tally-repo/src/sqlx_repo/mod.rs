use crate::budget_repo::BudgetRepo;
use crate::session_repo::SessionRepo;
use crate::transaction_repo::TransactionRepo;
use crate::user_repo::UserRepo;
use crate::HealthCheck;
use anyhow::Context;
use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

mod budget_repo;
mod session_repo;
mod transaction_repo;
mod user_repo;

// One statement per entry; the SQLite driver prepares them individually.
const SCHEMA: [&str; 6] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        email         TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id      INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        amount_cents INTEGER NOT NULL,
        category     TEXT NOT NULL,
        description  TEXT NOT NULL DEFAULT '',
        kind         TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
        date         TEXT NOT NULL,
        created_at   TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS budgets (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id      INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        category     TEXT NOT NULL,
        amount_cents INTEGER NOT NULL,
        month        TEXT NOT NULL,
        UNIQUE (user_id, category, month)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        token      TEXT PRIMARY KEY,
        user_id    INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        expires_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions (user_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions (expires_at)",
];

pub async fn create_repos(
    database_url: &str,
    max_pool_size: u32,
) -> Result<
    (
        Arc<dyn TransactionRepo>,
        Arc<dyn BudgetRepo>,
        Arc<dyn UserRepo>,
        Arc<dyn SessionRepo>,
        Arc<dyn HealthCheck>,
    ),
    anyhow::Error,
> {
    let options = SqliteConnectOptions::from_str(database_url)
        .context("Unable to parse database url")?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_pool_size)
        .connect_with(options)
        .await
        .context("Unable to connect to database")?;

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .context("Unable to initialize database schema")?;
    }

    Ok((
        Arc::new(transaction_repo::SqlxTransactionRepo::new(pool.clone())),
        Arc::new(budget_repo::SqlxBudgetRepo::new(pool.clone())),
        Arc::new(user_repo::SqlxUserRepo::new(pool.clone())),
        Arc::new(session_repo::SqlxSessionRepo::new(pool.clone())),
        Arc::new(SqlxHealthCheck { pool }),
    ))
}

struct SqlxHealthCheck {
    pool: SqlitePool,
}

#[async_trait]
impl HealthCheck for SqlxHealthCheck {
    async fn check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

/// Amounts are fixed-point with two decimal places; storing integer cents
/// keeps SQL summation exact.
fn to_cents(amount: Decimal) -> Result<i64, anyhow::Error> {
    (amount.round_dp(2) * Decimal::ONE_HUNDRED)
        .to_i64()
        .with_context(|| format!("amount {} out of range", amount))
}

fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
