mod utils;

use rstest::rstest;
use utils::RepoType;

#[rstest]
#[case::sqlx(RepoType::Sqlx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_health_check(#[case] repo_type: RepoType) {
    let repos = utils::build_repos(repo_type).await;
    assert!(repos.health_check.check().await);
}
