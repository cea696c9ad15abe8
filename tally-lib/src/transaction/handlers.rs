use crate::error::HandlerError;
use crate::user::UserId;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;
use tally_repo::transaction_repo::{NewTransaction, TransactionRepo};

#[get("")]
pub async fn get_all_transactions(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let transactions = transaction_repo
        .get_all_transactions(user_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(transactions))
}

#[post("")]
pub async fn create_new_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    new_transaction: web::Json<NewTransaction>,
) -> Result<impl Responder, HandlerError> {
    let new_transaction = validate(new_transaction.into_inner())?;
    let transaction = transaction_repo
        .create_new_transaction(user_id.into_inner(), new_transaction)
        .await?;
    Ok(HttpResponse::Created().json(transaction))
}

#[put("/{transaction_id}")]
pub async fn update_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    transaction_id: web::Path<i64>,
    updated_transaction: web::Json<NewTransaction>,
) -> Result<impl Responder, HandlerError> {
    let updated_transaction = validate(updated_transaction.into_inner())?;
    let transaction = transaction_repo
        .update_transaction(
            user_id.into_inner(),
            transaction_id.into_inner(),
            updated_transaction,
        )
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[delete("/{transaction_id}")]
pub async fn delete_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
    transaction_id: web::Path<i64>,
) -> Result<impl Responder, HandlerError> {
    transaction_repo
        .delete_transaction(user_id.into_inner(), transaction_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Rejects empty categories and normalizes the amount to two decimal places
/// so every backend stores the same value.
fn validate(mut new_transaction: NewTransaction) -> Result<NewTransaction, HandlerError> {
    if new_transaction.category.is_empty() {
        return Err(HandlerError::Validation(
            "Missing required fields".to_owned(),
        ));
    }
    new_transaction.amount = new_transaction.amount.round_dp(2);
    Ok(new_transaction)
}
