use actix_web::{web, Scope};

mod handlers;

pub fn budget_service() -> Scope {
    web::scope("/api/budgets")
        .service(handlers::get_budgets)
        .service(handlers::set_budget)
}
