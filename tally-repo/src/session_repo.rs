use crate::user_repo::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Server-side session store: opaque token to user id with an expiry.
/// Expired rows are invisible to lookups and reclaimed by a periodic sweep.
#[async_trait]
pub trait SessionRepo: Sync + Send {
    async fn create_session(&self, session: Session) -> Result<(), SessionRepoError>;

    /// Looks up a live session. An expired session is reported as not found.
    async fn get_session(&self, token: &str) -> Result<Session, SessionRepoError>;

    async fn delete_session(&self, token: &str) -> Result<(), SessionRepoError>;

    /// Removes sessions past their expiry, returning how many were swept.
    async fn delete_expired(&self) -> Result<u64, SessionRepoError>;
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum SessionRepoError {
    #[error("Session not found")]
    SessionNotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
