use depbot_database_interface::DatabaseError;
use depbot_models::{DependencyType, Manifest, Repository};
use maplit::btreemap;
use pretty_assertions::assert_eq;

use crate::testcase::db_test_case;

#[tokio::test]
async fn create_and_update() {
    db_test_case("repository_create_and_update", |db| async move {
        let repo = db
            .repositories_create(Repository {
                full_name: "me/repo".into(),
                ..Default::default()
            })
            .await?;
        assert_eq!(repo.id, 1);
        assert_eq!(repo.revision, 0);

        let updated = db
            .repositories_update(Repository {
                enabled: false,
                ..repo.clone()
            })
            .await?;
        assert_eq!(updated.revision, 1);
        assert!(!updated.enabled);

        // Stale revision
        assert!(matches!(
            db.repositories_update(repo).await,
            Err(DatabaseError::RevisionConflict {
                expected: 0,
                found: 1,
                ..
            })
        ));

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn mutate() {
    db_test_case("repository_mutate", |db| async move {
        assert!(matches!(
            db.repositories_mutate(1, 3, &|r| r.private = true).await,
            Err(DatabaseError::UnknownRepositoryId(1))
        ));

        let repo = db.repositories_create(Repository::default()).await?;
        let repo = db
            .repositories_mutate(repo.id, 3, &|r| {
                r.last_processed_commit = Some("abcdef".into())
            })
            .await?;

        assert_eq!(repo.last_processed_commit, Some("abcdef".into()));
        assert_eq!(repo.revision, 1);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn find_dependency_usages() {
    db_test_case("repository_find_dependency_usages", |db| async move {
        db.repositories_create(Repository {
            full_name: "me/one".into(),
            packages: btreemap! {
                "package.json".into() => Manifest::default()
                    .with_dependency(DependencyType::Dependencies, "lodash", "^4.17.20")
            },
            ..Default::default()
        })
        .await?;
        db.repositories_create(Repository {
            full_name: "me/two".into(),
            packages: btreemap! {
                "package.json".into() => Manifest::default()
                    .with_dependency(DependencyType::PeerDependencies, "lodash", "^4.0.0")
            },
            ..Default::default()
        })
        .await?;
        db.repositories_create(Repository {
            full_name: "me/three".into(),
            packages: btreemap! {
                "package.json".into() => Manifest::default()
                    .with_dependency(DependencyType::Dependencies, "react", "^18.0.0")
            },
            ..Default::default()
        })
        .await?;

        let usages = db
            .repositories_find_dependency_usages(&["lodash".into()])
            .await?;
        assert_eq!(
            usages
                .iter()
                .map(|u| (u.full_name.as_str(), u.dependency_type))
                .collect::<Vec<_>>(),
            vec![
                ("me/one", DependencyType::Dependencies),
                ("me/two", DependencyType::PeerDependencies)
            ]
        );

        Ok(())
    })
    .await;
}
