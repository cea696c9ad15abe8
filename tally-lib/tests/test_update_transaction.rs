use std::str::FromStr;

use actix_web::http::StatusCode;
use actix_web::test;
use actix_web::test::{read_body_json, TestRequest};
use chrono::NaiveDate;
use rstest::rstest;
use rust_decimal::Decimal;
use tally_repo::transaction_repo::{NewTransaction, Transaction, TransactionKind};
use tracing::instrument;
use utils::repos;
use utils::tracing_setup;
use utils::TestRepos;
use utils::TestUser;

#[macro_use]
mod utils;

fn new_transaction(amount: i64, category: &str) -> NewTransaction {
    NewTransaction {
        amount: Decimal::from(amount),
        category: category.to_owned(),
        description: String::new(),
        kind: TransactionKind::Expense,
        date: NaiveDate::from_str("2024-03-05").unwrap(),
    }
}

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_update_transaction(_tracing_setup: &(), repos: TestRepos) {
    let test_user = TestUser::new(&repos.user_repo).await;
    let app = build_app!(repos, test_user.id);
    let service = test::init_service(app).await;

    let transaction: Transaction = {
        let body = new_transaction(25, "Misc");
        create_transaction!(&service, body)
    };

    let update = NewTransaction {
        amount: Decimal::from(105),
        category: "Rent".to_owned(),
        description: "march rent".to_owned(),
        kind: TransactionKind::Expense,
        date: NaiveDate::from_str("2024-03-06").unwrap(),
    };
    let request = TestRequest::put()
        .uri(format!("/api/transactions/{}", transaction.id).as_str())
        .set_json(&update)
        .to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());

    let updated_transaction: Transaction = read_body_json(response).await;
    assert_eq!(transaction.id, updated_transaction.id);
    assert_ne!(transaction, updated_transaction);
    assert_eq!(updated_transaction.amount, update.amount);
    assert_eq!(updated_transaction.category, update.category);
    assert_eq!(updated_transaction.description, update.description);

    test_user.delete().await
}

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_update_other_users_transaction(_tracing_setup: &(), repos: TestRepos) {
    let owner = TestUser::new(&repos.user_repo).await;
    let other = TestUser::new(&repos.user_repo).await;

    let owner_app = build_app!(repos, owner.id);
    let owner_service = test::init_service(owner_app).await;
    let other_app = build_app!(repos, other.id);
    let other_service = test::init_service(other_app).await;

    let transaction: Transaction = {
        let body = new_transaction(25, "Misc");
        create_transaction!(&owner_service, body)
    };

    let update = new_transaction(9999, "Hijacked");
    let request = TestRequest::put()
        .uri(format!("/api/transactions/{}", transaction.id).as_str())
        .set_json(&update)
        .to_request();
    let response = test::call_service(&other_service, request).await;
    // indistinguishable from a missing row
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = TestRequest::get().uri("/api/transactions").to_request();
    let response = test::call_service(&owner_service, request).await;
    let transactions: Vec<Transaction> = read_body_json(response).await;
    assert_eq!(transactions, vec![transaction]);

    owner.delete().await;
    other.delete().await
}

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_update_invalid_transaction(_tracing_setup: &(), repos: TestRepos) {
    let test_user = TestUser::new(&repos.user_repo).await;
    let app = build_app!(repos, test_user.id);
    let service = test::init_service(app).await;

    let update = new_transaction(321, "Misc");
    let request = TestRequest::put()
        .uri(format!("/api/transactions/{}", 0).as_str()) // non-existent transaction ID
        .set_json(&update)
        .to_request();
    let response = test::call_service(&service, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    test_user.delete().await
}
