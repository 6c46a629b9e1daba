//! On-disk database initialization tests

use mcat_common::db::{init_database, EntityKind, DEFAULT_GENRES};
use mcat_common::CatalogStore;
use std::time::Duration;
use tempfile::TempDir;

const BUSY_TIMEOUT: Duration = Duration::from_millis(1000);

async fn table_names(store: &CatalogStore) -> Vec<String> {
    sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .fetch_all(store.pool())
    .await
    .unwrap()
}

#[tokio::test]
async fn test_creates_database_and_parent_folder() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("mcat.db");

    let pool = init_database(&db_path, BUSY_TIMEOUT).await.unwrap();
    let store = CatalogStore::new(pool);

    assert!(db_path.exists());
    let tables = table_names(&store).await;
    for kind in EntityKind::ALL {
        assert!(
            tables.iter().any(|t| t == kind.table_name()),
            "Should have table: {}",
            kind.table_name()
        );
    }
    store.close().await;
}

#[tokio::test]
async fn test_reopen_keeps_data() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("mcat.db");

    let store = CatalogStore::new(init_database(&db_path, BUSY_TIMEOUT).await.unwrap());
    let artist = store.create_artist("Fela Kuti").await.unwrap();
    store.close().await;

    let reopened = CatalogStore::new(init_database(&db_path, BUSY_TIMEOUT).await.unwrap());
    assert_eq!(reopened.get_artist(artist.artist_id).await.unwrap(), Some(artist));
    assert_eq!(
        reopened.count(EntityKind::Genre).await.unwrap(),
        DEFAULT_GENRES.len() as i64
    );
    reopened.close().await;
}

#[tokio::test]
async fn test_foreign_keys_on_every_connection() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("mcat.db");
    let store = CatalogStore::new(init_database(&db_path, BUSY_TIMEOUT).await.unwrap());

    // Hold one connection so the next statements use a different one
    let mut held = store.pool().acquire().await.unwrap();
    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&mut *held)
        .await
        .unwrap();
    assert_eq!(enabled, 1);

    let err = store.create_album("Orphan", 999).await.unwrap_err();
    assert!(err.is_constraint_violation());

    drop(held);
    store.close().await;
}

#[tokio::test]
async fn test_write_lock_contention_is_transient() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("mcat.db");
    let pool = init_database(&db_path, Duration::from_millis(50)).await.unwrap();
    let store = CatalogStore::new(pool);

    // First writer keeps its transaction (and the write lock) open
    let mut holder = store.pool().begin().await.unwrap();
    sqlx::query("INSERT INTO artists (artist_name) VALUES ('Holder')")
        .execute(&mut *holder)
        .await
        .unwrap();

    let err = store.create_artist("Blocked").await.unwrap_err();
    assert!(err.is_transient(), "Should be a busy error, got: {}", err);
    assert!(!err.is_constraint_violation());

    holder.rollback().await.unwrap();
    let artist = store.create_artist("Blocked").await.unwrap();
    assert_eq!(artist.artist_name, "Blocked");
    store.close().await;
}
