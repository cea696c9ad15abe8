use actix_web::{get, web, HttpResponse, Responder, Scope};
use serde_json::json;
use std::sync::Arc;
use tally_repo::HealthCheck;

pub fn health_service() -> Scope {
    web::scope("/api/health").service(health)
}

#[get("")]
pub async fn health(health_check: web::Data<Arc<dyn HealthCheck>>) -> impl Responder {
    if health_check.check().await {
        HttpResponse::Ok().json(json!({ "status": "ok" }))
    } else {
        HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
    }
}
