use super::{password, start_session, SESSION_COOKIE};
use crate::config::SessionConfig;
use crate::error::HandlerError;
use crate::user::UserId;
use actix_web::cookie::Cookie;
use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tally_repo::session_repo::SessionRepo;
use tally_repo::user_repo::{NewUser, User, UserRepo, UserRepoError};
use tracing::info;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// User profile as exposed over the API; the password hash never leaves
/// the server.
#[derive(Serialize, Deserialize)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> PublicUser {
        PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[post("/login")]
pub async fn login(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    session_repo: web::Data<Arc<dyn SessionRepo>>,
    session_config: web::Data<SessionConfig>,
    credentials: web::Json<LoginRequest>,
) -> Result<impl Responder, HandlerError> {
    let credentials = credentials.into_inner();
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(HandlerError::Validation(
            "Username and password are required".to_owned(),
        ));
    }

    // an unknown username and a wrong password must be indistinguishable
    let user = match user_repo.get_user_by_username(&credentials.username).await {
        Ok(user) => user,
        Err(UserRepoError::UserNotFound(_)) => return Err(HandlerError::InvalidCredentials),
        Err(e) => return Err(e.into()),
    };
    if !password::verify_password(&credentials.password, &user.password_hash)? {
        return Err(HandlerError::InvalidCredentials);
    }

    let ttl = Duration::hours(session_config.ttl_hours as i64);
    let session = start_session(user.id, ttl);
    session_repo.create_session(session.clone()).await?;
    info!(user_id = user.id, "user logged in");

    let cookie = Cookie::build(SESSION_COOKIE, session.token)
        .path("/")
        .http_only(true)
        .finish();
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(json!({ "user": PublicUser::from(user) })))
}

#[post("/logout")]
pub async fn logout(
    session_repo: web::Data<Arc<dyn SessionRepo>>,
    req: HttpRequest,
) -> Result<impl Responder, HandlerError> {
    let cookie = req.cookie(SESSION_COOKIE).ok_or(HandlerError::AuthRequired)?;
    session_repo.delete_session(cookie.value()).await?;

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.make_removal();
    Ok(HttpResponse::Ok()
        .cookie(removal)
        .json(json!({ "success": true })))
}

#[post("/signup")]
pub async fn signup(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    new_user: web::Json<SignupRequest>,
) -> Result<impl Responder, HandlerError> {
    let new_user = new_user.into_inner();
    if new_user.username.is_empty() || new_user.password.is_empty() {
        return Err(HandlerError::Validation(
            "Username and password are required".to_owned(),
        ));
    }

    let password_hash = password::encode_password(&new_user.password)?;
    let user = user_repo
        .create_user(NewUser {
            username: new_user.username,
            password_hash,
            email: new_user.email,
        })
        .await?;
    info!(user_id = user.id, "user signed up");

    Ok(HttpResponse::Created().json(PublicUser::from(user)))
}
