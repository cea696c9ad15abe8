use std::sync::Arc;
use tally_repo::budget_repo::BudgetRepo;
use tally_repo::session_repo::SessionRepo;
use tally_repo::transaction_repo::TransactionRepo;
use tally_repo::user_repo::{NewUser, UserId, UserRepo};
use tally_repo::HealthCheck;
use tempfile::NamedTempFile;
use uuid::Uuid;

#[derive(Debug)]
pub enum RepoType {
    Sqlx,
    Mem,
}

#[allow(dead_code)]
pub struct TestRepos {
    pub transaction_repo: Arc<dyn TransactionRepo>,
    pub budget_repo: Arc<dyn BudgetRepo>,
    pub user_repo: Arc<dyn UserRepo>,
    pub session_repo: Arc<dyn SessionRepo>,
    pub health_check: Arc<dyn HealthCheck>,
    // keeps the backing database file alive for the duration of the test
    _db_file: Option<NamedTempFile>,
}

pub async fn build_repos(repo_type: RepoType) -> TestRepos {
    match repo_type {
        RepoType::Sqlx => {
            let db_file = NamedTempFile::new().unwrap();
            let database_url = format!("sqlite://{}", db_file.path().display());
            let (transaction_repo, budget_repo, user_repo, session_repo, health_check) =
                tally_repo::sqlx_repo::create_repos(&database_url, 1)
                    .await
                    .unwrap();
            TestRepos {
                transaction_repo,
                budget_repo,
                user_repo,
                session_repo,
                health_check,
                _db_file: Some(db_file),
            }
        }
        RepoType::Mem => {
            let (transaction_repo, budget_repo, user_repo, session_repo, health_check) =
                tally_repo::mem_repo::create_repos();
            TestRepos {
                transaction_repo,
                budget_repo,
                user_repo,
                session_repo,
                health_check,
                _db_file: None,
            }
        }
    }
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: UserId,
    pub username: String,
    repo: Arc<dyn UserRepo>,
}

#[allow(dead_code)]
impl TestUser {
    pub async fn new(user_repo: &Arc<dyn UserRepo>) -> TestUser {
        let username = "test-user-".to_owned() + &Uuid::new_v4().to_string();
        let user = user_repo
            .create_user(NewUser {
                username: username.clone(),
                password_hash: "not a real hash".to_owned(),
                email: format!("{}@example.com", username),
            })
            .await
            .unwrap();
        TestUser {
            id: user.id,
            username,
            repo: user_repo.clone(),
        }
    }

    pub async fn delete(&self) {
        self.repo.delete_user(self.id).await.unwrap()
    }
}
