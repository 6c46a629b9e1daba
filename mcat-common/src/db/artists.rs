//! Artist persistence

use tracing::debug;

use super::{Artist, CatalogStore};
use crate::Result;

impl CatalogStore {
    /// Insert a new artist; the name must be unique
    pub async fn create_artist(&self, artist_name: &str) -> Result<Artist> {
        let mut tx = self.pool().begin().await?;

        let artist = sqlx::query_as::<_, Artist>(
            r#"
            INSERT INTO artists (artist_name)
            VALUES (?)
            RETURNING artist_id, artist_name
            "#,
        )
        .bind(artist_name)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(artist_id = artist.artist_id, "Created artist");
        Ok(artist)
    }

    pub async fn get_artist(&self, artist_id: i64) -> Result<Option<Artist>> {
        let artist = sqlx::query_as::<_, Artist>(
            "SELECT artist_id, artist_name FROM artists WHERE artist_id = ?",
        )
        .bind(artist_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(artist)
    }

    /// All artists in id order
    pub async fn list_artists(&self) -> Result<Vec<Artist>> {
        let artists = sqlx::query_as::<_, Artist>(
            "SELECT artist_id, artist_name FROM artists ORDER BY artist_id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(artists)
    }

    /// Returns `false` when no artist had this id.
    ///
    /// Albums still referencing the artist make the store reject the delete.
    pub async fn delete_artist(&self, artist_id: i64) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query("DELETE FROM artists WHERE artist_id = ?")
            .bind(artist_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
