use crate::auth::password;
use crate::error::HandlerError;
use crate::user::UserId;
use actix_web::{delete, put, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tally_repo::user_repo::UserRepo;
use tracing::info;

#[derive(Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

#[put("")]
pub async fn update_password(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    user_id: web::ReqData<UserId>,
    request: web::Json<UpdatePasswordRequest>,
) -> Result<impl Responder, HandlerError> {
    if request.password.is_empty() {
        return Err(HandlerError::Validation("Password is required".to_owned()));
    }

    let password_hash = password::encode_password(&request.password)?;
    user_repo
        .update_password_hash(user_id.into_inner(), &password_hash)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[delete("")]
pub async fn delete_user(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    user_repo.delete_user(user_id).await?;
    info!(user_id, "user deleted");
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
