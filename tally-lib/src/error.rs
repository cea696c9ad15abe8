use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use tally_repo::budget_repo::BudgetRepoError;
use tally_repo::session_repo::SessionRepoError;
use tally_repo::transaction_repo::TransactionRepoError;
use tally_repo::user_repo::UserRepoError;
use thiserror::Error;
use tracing::error;

/// Request-level error taxonomy. Every variant maps to a generic
/// `{"error": ...}` body; internal detail only reaches the server log.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    Validation(String),
    #[error("Authentication required")]
    AuthRequired,
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Covers both a missing row and a row owned by another user, so a
    /// caller cannot probe for the existence of other users' data.
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::Validation(_) => StatusCode::BAD_REQUEST,
            HandlerError::AuthRequired | HandlerError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Conflict(_) => StatusCode::CONFLICT,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let HandlerError::Internal(e) = self {
            error!(error = ?e, "request failed");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<TransactionRepoError> for HandlerError {
    fn from(e: TransactionRepoError) -> Self {
        match e {
            TransactionRepoError::TransactionNotFound(_) => {
                HandlerError::NotFound("Transaction not found")
            }
            TransactionRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<BudgetRepoError> for HandlerError {
    fn from(e: BudgetRepoError) -> Self {
        match e {
            BudgetRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<UserRepoError> for HandlerError {
    fn from(e: UserRepoError) -> Self {
        match e {
            UserRepoError::UserNotFound(_) => HandlerError::NotFound("User not found"),
            UserRepoError::UserAlreadyExists(username) => {
                HandlerError::Conflict(format!("User {} already exists", username))
            }
            UserRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<SessionRepoError> for HandlerError {
    fn from(e: SessionRepoError) -> Self {
        match e {
            SessionRepoError::SessionNotFound => HandlerError::AuthRequired,
            SessionRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<argon2::Error> for HandlerError {
    fn from(e: argon2::Error) -> Self {
        HandlerError::Internal(anyhow::Error::new(e))
    }
}
