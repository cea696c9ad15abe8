mod handlers;

use actix_web::{web, Scope};

pub use tally_repo::user_repo::UserId;

pub fn user_service() -> Scope {
    web::scope("/api/user")
        .service(handlers::update_password)
        .service(handlers::delete_user)
}
