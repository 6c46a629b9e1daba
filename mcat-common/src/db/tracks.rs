//! Track persistence

use tracing::debug;

use super::{CatalogStore, NewTrack, Track, TrackListing, TrackUpdate};
use crate::Result;

impl CatalogStore {
    pub async fn create_track(&self, track: &NewTrack) -> Result<Track> {
        let mut tx = self.pool().begin().await?;

        let created = sqlx::query_as::<_, Track>(
            r#"
            INSERT INTO tracks (track_name, album_id, genre)
            VALUES (?, ?, ?)
            RETURNING track_id, track_name, album_id, genre
            "#,
        )
        .bind(&track.track_name)
        .bind(track.album_id)
        .bind(&track.genre)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(track_id = created.track_id, album_id = created.album_id, "Created track");
        Ok(created)
    }

    pub async fn get_track(&self, track_id: i64) -> Result<Option<Track>> {
        let track = sqlx::query_as::<_, Track>(
            "SELECT track_id, track_name, album_id, genre FROM tracks WHERE track_id = ?",
        )
        .bind(track_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(track)
    }

    pub async fn list_tracks(&self) -> Result<Vec<Track>> {
        let tracks = sqlx::query_as::<_, Track>(
            "SELECT track_id, track_name, album_id, genre FROM tracks ORDER BY track_id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(tracks)
    }

    /// All tracks with the owning artist resolved through their album
    pub async fn list_track_listings(&self) -> Result<Vec<TrackListing>> {
        let listings = sqlx::query_as::<_, TrackListing>(
            r#"
            SELECT t.track_id, t.track_name, t.album_id, al.artist_id, t.genre
            FROM tracks t
            JOIN albums al ON al.album_id = t.album_id
            ORDER BY t.track_id
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(listings)
    }

    /// Apply a partial update. Returns `None` when the track does not exist.
    pub async fn update_track(&self, track_id: i64, update: &TrackUpdate) -> Result<Option<Track>> {
        let mut tx = self.pool().begin().await?;

        let updated = sqlx::query_as::<_, Track>(
            r#"
            UPDATE tracks SET
                track_name = COALESCE(?, track_name),
                album_id = COALESCE(?, album_id),
                genre = COALESCE(?, genre)
            WHERE track_id = ?
            RETURNING track_id, track_name, album_id, genre
            "#,
        )
        .bind(&update.track_name)
        .bind(update.album_id)
        .bind(&update.genre)
        .bind(track_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        if updated.is_some() {
            debug!(track_id, "Updated track");
        }
        Ok(updated)
    }

    /// Delete a track; its playlist memberships cascade
    pub async fn delete_track(&self, track_id: i64) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query("DELETE FROM tracks WHERE track_id = ?")
            .bind(track_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
