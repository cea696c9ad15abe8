use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::instrument;

pub struct SqlxUserRepo {
    pool: SqlitePool,
}

impl SqlxUserRepo {
    pub fn new(pool: SqlitePool) -> SqlxUserRepo {
        SqlxUserRepo { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserEntry {
    id: i64,
    username: String,
    password_hash: String,
    email: String,
}

impl From<UserEntry> for User {
    fn from(entry: UserEntry) -> User {
        User {
            id: entry.id,
            username: entry.username,
            password_hash: entry.password_hash,
            email: entry.email,
        }
    }
}

#[async_trait]
impl UserRepo for SqlxUserRepo {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let entry: Option<UserEntry> = sqlx::query_as(
            "SELECT id, username, password_hash, email FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user {}", user_id))?;

        entry
            .map(User::from)
            .ok_or_else(|| UserRepoError::UserNotFound(user_id.to_string()))
    }

    #[instrument(skip(self))]
    async fn get_user_by_username(&self, username: &str) -> Result<User, UserRepoError> {
        let entry: Option<UserEntry> = sqlx::query_as(
            "SELECT id, username, password_hash, email FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user {}", username))?;

        entry
            .map(User::from)
            .ok_or_else(|| UserRepoError::UserNotFound(username.to_owned()))
    }

    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        let id: Option<i64> = sqlx::query_scalar(
            "INSERT INTO users (username, password_hash, email) VALUES (?, ?, ?) \
             ON CONFLICT (username) DO NOTHING RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.email)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to create user {}", new_user.username))?;

        match id {
            Some(id) => Ok(User {
                id,
                username: new_user.username,
                password_hash: new_user.password_hash,
                email: new_user.email,
            }),
            None => Err(UserRepoError::UserAlreadyExists(new_user.username)),
        }
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password_hash(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> Result<(), UserRepoError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to update password for user {}", user_id))?;

        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserNotFound(user_id.to_string()))
        }
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete user {}", user_id))?;

        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserNotFound(user_id.to_string()))
        }
    }
}
