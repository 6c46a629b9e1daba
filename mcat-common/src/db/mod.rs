//! Catalog store: SQLite persistence for every entity kind
//!
//! Each `impl CatalogStore` block lives next to the entity it manages.
//! Reads run on a pooled connection; each mutation runs in its own
//! transaction and commits individually.

use sqlx::SqlitePool;

pub mod albums;
pub mod artists;
pub mod genres;
pub mod init;
pub mod listeners;
pub mod models;
pub mod playlists;
pub mod popularity;
pub mod tracks;

pub use init::{init_database, init_memory_database, DEFAULT_GENRES};
pub use models::*;

use crate::Result;

/// Handle to the catalog database.
///
/// Constructed once by the composition root and cloned into each request;
/// clones share the same pool.
#[derive(Clone, Debug)]
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of persisted rows of the given kind
    pub async fn count(&self, kind: EntityKind) -> Result<i64> {
        // Table names come from a closed enum, never from request input
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table_name());
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::memory_store;
    use super::*;

    #[tokio::test]
    async fn test_count_per_kind() {
        let store = memory_store().await;
        store.create_artist("Count Basie").await.unwrap();

        assert_eq!(store.count(EntityKind::Artist).await.unwrap(), 1);
        assert_eq!(store.count(EntityKind::Track).await.unwrap(), 0);
        assert_eq!(
            store.count(EntityKind::Genre).await.unwrap(),
            DEFAULT_GENRES.len() as i64
        );
    }
}
