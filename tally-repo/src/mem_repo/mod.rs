use crate::budget_repo::BudgetRepo;
use crate::session_repo::SessionRepo;
use crate::transaction_repo::TransactionRepo;
use crate::user_repo::UserRepo;
use crate::HealthCheck;
use async_trait::async_trait;
use std::sync::Arc;

mod budget_repo;
mod session_repo;
mod transaction_repo;
mod user_repo;

pub fn create_repos() -> (
    Arc<dyn TransactionRepo>,
    Arc<dyn BudgetRepo>,
    Arc<dyn UserRepo>,
    Arc<dyn SessionRepo>,
    Arc<dyn HealthCheck>,
) {
    (
        Arc::new(transaction_repo::MemTransactionRepo::new()),
        Arc::new(budget_repo::MemBudgetRepo::new()),
        Arc::new(user_repo::MemUserRepo::new()),
        Arc::new(session_repo::MemSessionRepo::new()),
        Arc::new(AlwaysHealthy),
    )
}

struct AlwaysHealthy;

#[async_trait]
impl HealthCheck for AlwaysHealthy {
    async fn check(&self) -> bool {
        true
    }
}
