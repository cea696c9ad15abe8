use rstest::fixture;
use std::sync::Arc;
use tally_lib::auth::password;
use tally_repo::budget_repo::BudgetRepo;
use tally_repo::session_repo::SessionRepo;
use tally_repo::transaction_repo::TransactionRepo;
use tally_repo::user_repo::{NewUser, UserId, UserRepo};
use tally_repo::HealthCheck;
use tracing::info;
use tracing::Level;
use uuid::Uuid;

#[allow(dead_code)]
pub mod mock;

#[allow(unused_macros)]
macro_rules! build_app {
    ($repos:expr, $user_id:expr) => {{
        let app = actix_web::App::new()
            .app_data(actix_web::web::Data::new($repos.transaction_repo.clone()))
            .app_data(actix_web::web::Data::new($repos.budget_repo.clone()))
            .app_data(actix_web::web::Data::new($repos.user_repo.clone()))
            .wrap(tally_lib::tracing::create_middleware())
            .service(
                tally_lib::transaction::transaction_service()
                    .wrap(crate::utils::mock::MockAuthentication { user_id: $user_id }),
            )
            .service(
                tally_lib::budget::budget_service()
                    .wrap(crate::utils::mock::MockAuthentication { user_id: $user_id }),
            )
            .service(
                tally_lib::dashboard::dashboard_service()
                    .wrap(crate::utils::mock::MockAuthentication { user_id: $user_id }),
            )
            .service(
                tally_lib::user::user_service()
                    .wrap(crate::utils::mock::MockAuthentication { user_id: $user_id }),
            );
        tracing::info!("Built app");
        app
    }};
}

#[allow(unused_macros)]
macro_rules! set_budget {
    (&$service:ident, $body:expr) => {{
        let request = actix_web::test::TestRequest::post()
            .uri("/api/budgets")
            .set_json(&$body)
            .to_request();
        let response = actix_web::test::call_service(&$service, request).await;
        assert!(
            response.status().is_success(),
            "Got {} response when setting budget",
            response.status()
        );
        actix_web::test::read_body_json(response).await
    }};
}

#[allow(unused_macros)]
macro_rules! create_transaction {
    (&$service:ident, $new_transaction:ident) => {{
        let request = actix_web::test::TestRequest::post()
            .uri("/api/transactions")
            .set_json(&$new_transaction)
            .to_request();
        let response = actix_web::test::call_service(&$service, request).await;
        assert!(
            response.status().is_success(),
            "Got {} response when creating transaction",
            response.status()
        );
        actix_web::test::read_body_json(response).await
    }};
}

#[allow(dead_code)]
pub struct TestRepos {
    pub transaction_repo: Arc<dyn TransactionRepo>,
    pub budget_repo: Arc<dyn BudgetRepo>,
    pub user_repo: Arc<dyn UserRepo>,
    pub session_repo: Arc<dyn SessionRepo>,
    pub health_check: Arc<dyn HealthCheck>,
}

#[fixture]
pub fn repos() -> TestRepos {
    let (transaction_repo, budget_repo, user_repo, session_repo, health_check) =
        tally_repo::mem_repo::create_repos();
    TestRepos {
        transaction_repo,
        budget_repo,
        user_repo,
        session_repo,
        health_check,
    }
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: UserId,
    pub username: String,
    pub password: String,
    repo: Arc<dyn UserRepo>,
}

#[allow(dead_code)]
impl TestUser {
    pub async fn new(user_repo: &Arc<dyn UserRepo>) -> TestUser {
        let username = "test-user-".to_owned() + &Uuid::new_v4().to_string();
        let password = "correct horse battery staple".to_owned();
        let user = user_repo
            .create_user(NewUser {
                username: username.clone(),
                password_hash: password::encode_password(&password).unwrap(),
                email: format!("{}@example.com", username),
            })
            .await
            .unwrap();
        info!(user_id = user.id, "Created user");
        TestUser {
            id: user.id,
            username,
            password,
            repo: user_repo.clone(),
        }
    }

    pub async fn delete(&self) {
        self.repo.delete_user(self.id).await.unwrap()
    }
}
