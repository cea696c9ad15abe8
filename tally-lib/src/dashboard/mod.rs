use actix_web::{web, Scope};

mod handlers;

pub use handlers::DashboardStats;

pub fn dashboard_service() -> Scope {
    web::scope("/api/dashboard").service(handlers::get_stats)
}
