use std::str::FromStr;

use actix_web::test;
use actix_web::test::{read_body_json, TestRequest};
use rstest::rstest;
use rust_decimal::Decimal;
use tally_lib::dashboard::DashboardStats;
use tally_repo::month::Month;
use tally_repo::transaction_repo::{NewTransaction, Transaction, TransactionKind};
use tracing::instrument;
use utils::repos;
use utils::tracing_setup;
use utils::TestRepos;
use utils::TestUser;

#[macro_use]
mod utils;

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_dashboard_stats(_tracing_setup: &(), repos: TestRepos) {
    let test_user = TestUser::new(&repos.user_repo).await;
    let app = build_app!(repos, test_user.id);
    let service = test::init_service(app).await;

    let this_month = Month::current().first_day();
    let last_month = this_month.pred_opt().unwrap();

    for (amount, category, kind, date) in [
        ("1000.00", "Salary", TransactionKind::Income, this_month),
        ("200.00", "food", TransactionKind::Expense, this_month),
        ("50.00", "food", TransactionKind::Expense, last_month),
    ] {
        let body = NewTransaction {
            amount: Decimal::from_str(amount).unwrap(),
            category: category.to_owned(),
            description: String::new(),
            kind,
            date,
        };
        let _: Transaction = create_transaction!(&service, body);
    }

    let request = TestRequest::get().uri("/api/dashboard/stats").to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());

    let stats: DashboardStats = read_body_json(response).await;
    assert_eq!(stats.income, Decimal::from(1000));
    assert_eq!(stats.expenses, Decimal::from(200));
    // the balance spans all time, not just the current month
    assert_eq!(stats.balance, Decimal::from(750));
    assert_eq!(stats.category_breakdown.len(), 1);
    assert_eq!(stats.category_breakdown[0].category, "food");
    assert_eq!(stats.category_breakdown[0].amount, Decimal::from(200));

    test_user.delete().await
}

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_dashboard_stats_with_no_transactions(_tracing_setup: &(), repos: TestRepos) {
    let test_user = TestUser::new(&repos.user_repo).await;
    let app = build_app!(repos, test_user.id);
    let service = test::init_service(app).await;

    let request = TestRequest::get().uri("/api/dashboard/stats").to_request();
    let response = test::call_service(&service, request).await;
    assert!(response.status().is_success());

    let stats: DashboardStats = read_body_json(response).await;
    assert_eq!(stats.income, Decimal::ZERO);
    assert_eq!(stats.expenses, Decimal::ZERO);
    assert_eq!(stats.balance, Decimal::ZERO);
    assert!(stats.category_breakdown.is_empty());

    test_user.delete().await
}

#[instrument(skip(repos))]
#[rstest]
#[actix_rt::test]
async fn test_dashboard_scoped_to_user(_tracing_setup: &(), repos: TestRepos) {
    let test_user = TestUser::new(&repos.user_repo).await;
    let other = TestUser::new(&repos.user_repo).await;

    let other_app = build_app!(repos, other.id);
    let other_service = test::init_service(other_app).await;
    let body = NewTransaction {
        amount: Decimal::from(500),
        category: "Salary".to_owned(),
        description: String::new(),
        kind: TransactionKind::Income,
        date: Month::current().first_day(),
    };
    let _: Transaction = create_transaction!(&other_service, body);

    let app = build_app!(repos, test_user.id);
    let service = test::init_service(app).await;
    let request = TestRequest::get().uri("/api/dashboard/stats").to_request();
    let response = test::call_service(&service, request).await;
    let stats: DashboardStats = read_body_json(response).await;
    assert_eq!(stats.income, Decimal::ZERO);
    assert_eq!(stats.balance, Decimal::ZERO);

    test_user.delete().await;
    other.delete().await
}
