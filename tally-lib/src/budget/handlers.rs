use crate::error::HandlerError;
use crate::user::UserId;
use actix_web::{get, post, web, HttpResponse, Responder};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tally_repo::budget_repo::{BudgetRepo, NewBudget};
use tally_repo::month::Month;

#[derive(Deserialize)]
pub struct BudgetQuery {
    pub month: Option<Month>,
}

#[derive(Deserialize)]
pub struct SetBudgetRequest {
    pub category: String,
    pub amount: Decimal,
    pub month: Option<Month>,
}

#[get("")]
pub async fn get_budgets(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<BudgetQuery>,
) -> Result<impl Responder, HandlerError> {
    // the month parameter defaults to the current calendar month
    let month = query.month.unwrap_or_else(Month::current);
    let budgets = budget_repo.get_budgets(user_id.into_inner(), month).await?;
    Ok(HttpResponse::Ok().json(budgets))
}

#[post("")]
pub async fn set_budget(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    user_id: web::ReqData<UserId>,
    request: web::Json<SetBudgetRequest>,
) -> Result<impl Responder, HandlerError> {
    let request = request.into_inner();
    if request.category.is_empty() {
        return Err(HandlerError::Validation(
            "Category and amount are required".to_owned(),
        ));
    }

    let new_budget = NewBudget {
        category: request.category,
        amount: request.amount.round_dp(2),
        month: request.month.unwrap_or_else(Month::current),
    };
    let budgets = budget_repo
        .set_budget(user_id.into_inner(), new_budget)
        .await?;
    Ok(HttpResponse::Ok().json(budgets))
}
