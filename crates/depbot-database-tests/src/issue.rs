use depbot_models::{Branch, BranchPurpose, Issue, IssueState, Repository};
use pretty_assertions::assert_eq;

use crate::testcase::db_test_case;

#[tokio::test]
async fn open_lookup() {
    db_test_case("issue_open_lookup", |db| async move {
        let repo = db.repositories_create(Repository::default()).await?;
        assert_eq!(db.issues_get_open(repo.id, "react").await?, None);

        let closed = db
            .issues_create(Issue {
                repository_id: repo.id,
                number: 3,
                key: "react".into(),
                state: IssueState::Closed,
                ..Default::default()
            })
            .await?;
        assert_eq!(db.issues_get_open(repo.id, "react").await?, None);

        let open = db
            .issues_create(Issue {
                repository_id: repo.id,
                number: 4,
                key: "react".into(),
                version: "16.0.0".into(),
                ..Default::default()
            })
            .await?;
        assert_eq!(db.issues_get_open(repo.id, "react").await?, Some(open.clone()));
        assert_eq!(db.issues_get_by_number(repo.id, 3).await?, Some(closed));

        let open = db
            .issues_mutate(open.id, 3, &|i| i.comments.push("16.1.0".into()))
            .await?;
        assert_eq!(open.comments, vec!["16.1.0".to_string()]);
        assert_eq!(open.revision, 1);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn create_with_pin_branch() {
    db_test_case("issue_create_with_pin_branch", |db| async move {
        let repo = db.repositories_create(Repository::default()).await?;
        let (issue, branch) = db
            .issues_create_with_pin_branch(
                Issue {
                    repository_id: repo.id,
                    number: 10,
                    key: "react".into(),
                    ..Default::default()
                },
                Some(Branch {
                    repository_id: repo.id,
                    dependency: "react".into(),
                    purpose: BranchPurpose::Pin,
                    issue_number: Some(10),
                    ..Default::default()
                }),
            )
            .await?;

        let branch = branch.unwrap();
        assert_eq!(db.issues_get_expect(issue.id).await?, issue);
        assert_eq!(db.branches_get_expect(branch.id).await?, branch);
        assert_eq!(branch.issue_number, Some(issue.number));

        Ok(())
    })
    .await;
}
