use crate::error::HandlerError;
use crate::user::UserId;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, HttpMessage, Scope};
use base64::Engine;
use chrono::{Duration, Utc};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;
use tally_repo::session_repo::{Session, SessionRepo};
use tracing_actix_web::RootSpan;

pub mod handlers;
pub mod password;

/// Name of the cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "tally_session";

pub fn auth_service(signups_enabled: bool) -> Scope {
    let scope = web::scope("/api/auth")
        .service(handlers::login)
        .service(handlers::logout);
    if signups_enabled {
        scope.service(handlers::signup)
    } else {
        scope
    }
}

/// Builds a session for `user_id` with a fresh random token.
pub fn start_session(user_id: UserId, ttl: Duration) -> Session {
    let token_bytes: [u8; 32] = rand::random();
    let token = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(token_bytes);
    Session {
        token,
        user_id,
        expires_at: Utc::now() + ttl,
    }
}

/// Middleware guarding a scope: resolves the session cookie to a [UserId],
/// injects it into the request and records it on the [RootSpan]. Requests
/// without a live session never reach the wrapped handlers.
#[derive(Clone)]
pub struct SessionAuth {
    session_repo: Arc<dyn SessionRepo>,
}

impl SessionAuth {
    pub fn new(session_repo: Arc<dyn SessionRepo>) -> SessionAuth {
        SessionAuth { session_repo }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = SessionAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            session_repo: self.session_repo.clone(),
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    session_repo: Arc<dyn SessionRepo>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let session_repo = self.session_repo.clone();
        Box::pin(async move {
            let Some(cookie) = req.cookie(SESSION_COOKIE) else {
                return Err(HandlerError::AuthRequired.into());
            };
            let session = session_repo
                .get_session(cookie.value())
                .await
                .map_err(HandlerError::from)?;

            if let Some(root_span) = req.extensions().get::<RootSpan>() {
                root_span.record("user_id", session.user_id);
            }
            req.extensions_mut().insert::<UserId>(session.user_id);
            service.call(req).await
        })
    }
}
