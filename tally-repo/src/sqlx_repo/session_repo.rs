use crate::session_repo::SessionRepoError::SessionNotFound;
use crate::session_repo::{Session, SessionRepo, SessionRepoError};
use crate::user_repo::UserId;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

pub struct SqlxSessionRepo {
    pool: SqlitePool,
}

impl SqlxSessionRepo {
    pub fn new(pool: SqlitePool) -> SqlxSessionRepo {
        SqlxSessionRepo { pool }
    }
}

// expiry is stored as a unix timestamp so the sweep is an integer comparison
#[derive(sqlx::FromRow)]
struct SessionEntry {
    token: String,
    user_id: UserId,
    expires_at: i64,
}

impl TryFrom<SessionEntry> for Session {
    type Error = anyhow::Error;

    fn try_from(entry: SessionEntry) -> Result<Session, anyhow::Error> {
        let expires_at = DateTime::from_timestamp(entry.expires_at, 0)
            .with_context(|| format!("invalid session expiry {}", entry.expires_at))?;
        Ok(Session {
            token: entry.token,
            user_id: entry.user_id,
            expires_at,
        })
    }
}

#[async_trait]
impl SessionRepo for SqlxSessionRepo {
    #[instrument(skip(self, session), fields(user_id = session.user_id))]
    async fn create_session(&self, session: Session) -> Result<(), SessionRepoError> {
        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(&session.token)
            .bind(session.user_id)
            .bind(session.expires_at.timestamp())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to create session for user {}", session.user_id))?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn get_session(&self, token: &str) -> Result<Session, SessionRepoError> {
        let entry: Option<SessionEntry> = sqlx::query_as(
            "SELECT token, user_id, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .context("Unable to get session")?;

        match entry {
            Some(entry) => {
                let session: Session = entry.try_into()?;
                if session.expires_at > Utc::now() {
                    Ok(session)
                } else {
                    Err(SessionNotFound)
                }
            }
            None => Err(SessionNotFound),
        }
    }

    #[instrument(skip(self, token))]
    async fn delete_session(&self, token: &str) -> Result<(), SessionRepoError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .context("Unable to delete session")?;

        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(SessionNotFound)
        }
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self) -> Result<u64, SessionRepoError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .context("Unable to sweep expired sessions")?;
        Ok(result.rows_affected())
    }
}
