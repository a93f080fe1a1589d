use depbot_database_interface::DatabaseError;
use depbot_models::MonorepoRelease;
use maplit::btreeset;
use pretty_assertions::assert_eq;

use crate::testcase::db_test_case;

#[tokio::test]
async fn create_is_unique_per_version() {
    db_test_case("monorepo_release_unique", |db| async move {
        let release = db
            .monorepo_releases_create(MonorepoRelease {
                group: "react".into(),
                version: "18.3.0".into(),
                members: btreeset! {"react".into()},
                ..Default::default()
            })
            .await?;

        assert!(matches!(
            db.monorepo_releases_create(MonorepoRelease {
                group: "react".into(),
                version: "18.3.0".into(),
                ..Default::default()
            })
            .await,
            Err(DatabaseError::AlreadyExists { .. })
        ));

        let mut updated = release.clone();
        updated.members.insert("react-dom".into());
        let updated = db.monorepo_releases_update(updated).await?;
        assert_eq!(
            db.monorepo_releases_get("react", "18.3.0").await?,
            Some(updated.clone())
        );
        assert!(db.monorepo_releases_update(release).await.is_err());

        assert!(db.monorepo_releases_delete(updated.id).await?);
        assert!(!db.monorepo_releases_delete(updated.id).await?);
        assert_eq!(db.monorepo_releases_get("react", "18.3.0").await?, None);

        Ok(())
    })
    .await;
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    db_test_case("monorepo_release_ids", |db| async move {
        let first = db
            .monorepo_releases_create(MonorepoRelease {
                group: "react".into(),
                version: "18.3.0".into(),
                ..Default::default()
            })
            .await?;
        assert!(db.monorepo_releases_delete(first.id).await?);

        let second = db
            .monorepo_releases_create(MonorepoRelease {
                group: "react".into(),
                version: "18.3.0".into(),
                ..Default::default()
            })
            .await?;
        assert!(second.id > first.id);
        assert_eq!(db.monorepo_releases_get("react", "18.3.0").await?, Some(second));

        Ok(())
    })
    .await;
}
