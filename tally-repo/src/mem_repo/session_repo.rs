use crate::session_repo::SessionRepoError::SessionNotFound;
use crate::session_repo::{Session, SessionRepo, SessionRepoError};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct MemSessionRepo {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemSessionRepo {
    pub fn new() -> MemSessionRepo {
        MemSessionRepo {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<HashMap<String, Session>>, anyhow::Error> {
        self.sessions
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<HashMap<String, Session>>, anyhow::Error> {
        self.sessions
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

#[async_trait]
impl SessionRepo for MemSessionRepo {
    async fn create_session(&self, session: Session) -> Result<(), SessionRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard.insert(session.token.clone(), session);
        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Session, SessionRepoError> {
        let read_guard = self.read_lock()?;

        match read_guard.get(token) {
            Some(session) if session.expires_at > Utc::now() => Ok(session.clone()),
            _ => Err(SessionNotFound),
        }
    }

    async fn delete_session(&self, token: &str) -> Result<(), SessionRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.remove(token).is_some() {
            Ok(())
        } else {
            Err(SessionNotFound)
        }
    }

    async fn delete_expired(&self) -> Result<u64, SessionRepoError> {
        let mut write_guard = self.write_lock()?;

        let now = Utc::now();
        let before = write_guard.len();
        write_guard.retain(|_, session| session.expires_at > now);
        Ok((before - write_guard.len()) as u64)
    }
}
