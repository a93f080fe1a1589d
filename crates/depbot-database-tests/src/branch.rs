use depbot_database_interface::DatabaseError;
use depbot_models::{Branch, DependencyType, Repository};
use pretty_assertions::assert_eq;

use crate::testcase::db_test_case;

#[tokio::test]
async fn create() {
    db_test_case("branch_create", |db| async move {
        assert!(matches!(
            db.branches_create(Branch {
                repository_id: 1,
                ..Default::default()
            })
            .await,
            Err(DatabaseError::UnknownRepositoryId(1))
        ));

        let repo = db.repositories_create(Repository::default()).await?;
        let branch = db
            .branches_create(Branch {
                repository_id: repo.id,
                dependency: "lodash".into(),
                ..Default::default()
            })
            .await?;

        assert_eq!(branch.id, 1);
        assert_eq!(db.branches_get_expect(1).await?, branch);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn lookups_skip_deleted_except_by_sha() {
    db_test_case("branch_lookups", |db| async move {
        let repo = db.repositories_create(Repository::default()).await?;
        let plain = db
            .branches_create(Branch {
                repository_id: repo.id,
                dependency: "lodash".into(),
                sha: "aaa".into(),
                ..Default::default()
            })
            .await?;
        let grouped = db
            .branches_create(Branch {
                repository_id: repo.id,
                dependency: "lodash".into(),
                group_name: Some("frontend".into()),
                monorepo_group: Some("lodash-suite".into()),
                sha: "bbb".into(),
                ..Default::default()
            })
            .await?;
        db.branches_create(Branch {
            repository_id: repo.id,
            dependency: "lodash".into(),
            dependency_type: DependencyType::DevDependencies,
            sha: "ccc".into(),
            ..Default::default()
        })
        .await?;

        let found = db
            .branches_list_by_dependency(repo.id, "lodash", DependencyType::Dependencies)
            .await?;
        assert_eq!(found, vec![plain.clone(), grouped.clone()]);
        assert_eq!(
            db.branches_list_by_group(repo.id, "frontend").await?,
            vec![grouped.clone()]
        );
        assert_eq!(
            db.branches_list_by_monorepo_group(repo.id, "lodash-suite")
                .await?,
            vec![grouped.clone()]
        );

        let deleted = db
            .branches_mutate(grouped.id, 3, &|b| b.reference_deleted = true)
            .await?;
        assert!(db
            .branches_list_by_group(repo.id, "frontend")
            .await?
            .is_empty());
        assert_eq!(
            db.branches_list_by_dependency(repo.id, "lodash", DependencyType::Dependencies)
                .await?,
            vec![plain]
        );
        assert_eq!(
            db.branches_get_by_sha(repo.id, "bbb").await?,
            Some(deleted)
        );
        assert_eq!(db.branches_get_by_sha(repo.id + 1, "bbb").await?, None);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn update_checks_revision() {
    db_test_case("branch_update_revision", |db| async move {
        let repo = db.repositories_create(Repository::default()).await?;
        let branch = db
            .branches_create(Branch {
                repository_id: repo.id,
                ..Default::default()
            })
            .await?;

        db.branches_update(Branch {
            processed: true,
            ..branch.clone()
        })
        .await?;

        assert!(matches!(
            db.branches_update(branch).await,
            Err(DatabaseError::RevisionConflict { kind: "branch", .. })
        ));

        Ok(())
    })
    .await;
}
