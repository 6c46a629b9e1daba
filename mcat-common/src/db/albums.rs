//! Album persistence

use tracing::debug;

use super::{Album, CatalogStore};
use crate::Result;

impl CatalogStore {
    /// Insert a new album owned by `artist_id`
    pub async fn create_album(&self, album_name: &str, artist_id: i64) -> Result<Album> {
        let mut tx = self.pool().begin().await?;

        let album = sqlx::query_as::<_, Album>(
            r#"
            INSERT INTO albums (album_name, artist_id)
            VALUES (?, ?)
            RETURNING album_id, album_name, artist_id
            "#,
        )
        .bind(album_name)
        .bind(artist_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(album_id = album.album_id, artist_id, "Created album");
        Ok(album)
    }

    pub async fn get_album(&self, album_id: i64) -> Result<Option<Album>> {
        let album = sqlx::query_as::<_, Album>(
            "SELECT album_id, album_name, artist_id FROM albums WHERE album_id = ?",
        )
        .bind(album_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(album)
    }

    pub async fn list_albums(&self) -> Result<Vec<Album>> {
        let albums = sqlx::query_as::<_, Album>(
            "SELECT album_id, album_name, artist_id FROM albums ORDER BY album_id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(albums)
    }

    pub async fn delete_album(&self, album_id: i64) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query("DELETE FROM albums WHERE album_id = ?")
            .bind(album_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::memory_store;

    #[tokio::test]
    async fn test_create_album_for_artist() {
        let store = memory_store().await;
        let artist = store.create_artist("Miles Davis").await.unwrap();

        let album = store.create_album("Kind of Blue", artist.artist_id).await.unwrap();
        let loaded = store.get_album(album.album_id).await.unwrap().unwrap();

        assert_eq!(loaded.album_name, "Kind of Blue");
        assert_eq!(loaded.artist_id, artist.artist_id);
        assert_eq!(store.list_albums().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_album_for_missing_artist_rejected() {
        let store = memory_store().await;

        let err = store.create_album("Nobody's Album", 7).await.unwrap_err();
        assert!(err.is_constraint_violation());
        assert!(store.list_albums().await.unwrap().is_empty());
    }
}
