use maplit::btreemap;
use pretty_assertions::assert_eq;

use crate::testcase::db_test_case;

#[tokio::test]
async fn save() {
    db_test_case("registry_snapshot_save", |db| async move {
        assert_eq!(db.registry_snapshots_get("lodash").await?, None);

        let tags = btreemap! {"latest".to_string() => "4.17.20".to_string()};
        let created = db.registry_snapshots_save("lodash", &tags, 3).await?;
        assert_eq!(created.revision, 0);

        let tags = btreemap! {
            "latest".to_string() => "4.17.21".to_string(),
            "next".to_string() => "5.0.0-rc.1".to_string(),
        };
        let updated = db.registry_snapshots_save("lodash", &tags, 3).await?;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.revision, 1);
        assert_eq!(updated.dist_tags, tags);

        Ok(())
    })
    .await;
}
