//! Integration tests for database initialization

use tlk_common::db::{get_setting, init_database_pool, set_setting};

#[tokio::test]
async fn init_creates_database_file_and_settings_table() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("nested").join("tlk.db");

    let pool = init_database_pool(&db_path).await.unwrap();
    assert!(db_path.exists());

    // Settings table is usable immediately
    set_setting(&pool, "probe", "1").await.unwrap();
    let value: Option<String> = get_setting(&pool, "probe").await.unwrap();
    assert_eq!(value, Some("1".to_string()));
}

#[tokio::test]
async fn reopening_the_same_database_preserves_settings() {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("tlk.db");

    {
        let pool = init_database_pool(&db_path).await.unwrap();
        set_setting(&pool, "persisted", "yes").await.unwrap();
        pool.close().await;
    }

    let pool = init_database_pool(&db_path).await.unwrap();
    let value: Option<String> = get_setting(&pool, "persisted").await.unwrap();
    assert_eq!(value, Some("yes".to_string()));
}
