use depbot_models::{PullRequest, PullRequestState, Repository};
use pretty_assertions::assert_eq;

use crate::testcase::db_test_case;

#[tokio::test]
async fn find_open() {
    db_test_case("pull_request_find_open", |db| async move {
        let repo = db.repositories_create(Repository::default()).await?;
        db.pull_requests_create(PullRequest {
            repository_id: repo.id,
            number: 1,
            initial: true,
            state: PullRequestState::Closed,
            ..Default::default()
        })
        .await?;
        let grouped = db
            .pull_requests_create(PullRequest {
                repository_id: repo.id,
                number: 2,
                subgroup_initial: true,
                group_name: Some("frontend".into()),
                ..Default::default()
            })
            .await?;

        assert_eq!(db.pull_requests_find_open(repo.id, None, None).await?, None);
        assert_eq!(
            db.pull_requests_find_open(repo.id, None, Some("frontend"))
                .await?,
            Some(grouped.clone())
        );

        let grouped = db
            .pull_requests_mutate(grouped.id, 3, &|p| p.confirmation_commented = true)
            .await?;
        assert!(grouped.confirmation_commented);

        Ok(())
    })
    .await;
}
