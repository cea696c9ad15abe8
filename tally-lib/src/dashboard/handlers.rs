use crate::error::HandlerError;
use crate::user::UserId;
use actix_web::{get, web, HttpResponse, Responder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tally_repo::month::Month;
use tally_repo::transaction_repo::{CategoryTotal, TransactionRepo};

#[derive(Serialize, Deserialize, PartialEq, Debug)]
pub struct DashboardStats {
    /// Income within the current calendar month.
    pub income: Decimal,
    /// Expenses within the current calendar month.
    pub expenses: Decimal,
    /// All-time income minus all-time expense.
    pub balance: Decimal,
    #[serde(rename = "categoryBreakdown")]
    pub category_breakdown: Vec<CategoryTotal>,
}

#[get("/stats")]
pub async fn get_stats(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let month = Month::current();

    // three independent read-only aggregates, fetched concurrently
    let (totals, category_breakdown, balance) = futures::try_join!(
        transaction_repo.month_totals(user_id, month),
        transaction_repo.expense_breakdown(user_id, month),
        transaction_repo.balance(user_id),
    )?;

    Ok(HttpResponse::Ok().json(DashboardStats {
        income: totals.income,
        expenses: totals.expense,
        balance,
        category_breakdown,
    }))
}
