//! Playlist persistence and playlist/track links

use tracing::debug;

use super::{CatalogStore, Playlist, PlaylistTrack, Track};
use crate::Result;

impl CatalogStore {
    /// Insert a new playlist owned by listener `user_id`
    pub async fn create_playlist(&self, playlist_name: &str, user_id: i64) -> Result<Playlist> {
        let mut tx = self.pool().begin().await?;

        let playlist = sqlx::query_as::<_, Playlist>(
            r#"
            INSERT INTO playlists (playlist_name, user_id)
            VALUES (?, ?)
            RETURNING playlist_id, playlist_name, user_id
            "#,
        )
        .bind(playlist_name)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(playlist_id = playlist.playlist_id, user_id, "Created playlist");
        Ok(playlist)
    }

    pub async fn get_playlist(&self, playlist_id: i64) -> Result<Option<Playlist>> {
        let playlist = sqlx::query_as::<_, Playlist>(
            "SELECT playlist_id, playlist_name, user_id FROM playlists WHERE playlist_id = ?",
        )
        .bind(playlist_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(playlist)
    }

    pub async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        let playlists = sqlx::query_as::<_, Playlist>(
            "SELECT playlist_id, playlist_name, user_id FROM playlists ORDER BY playlist_id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(playlists)
    }

    /// Delete a playlist; its track links cascade
    pub async fn delete_playlist(&self, playlist_id: i64) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query("DELETE FROM playlists WHERE playlist_id = ?")
            .bind(playlist_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link a track into a playlist. Linking the same pair twice is rejected by the store.
    pub async fn add_track_to_playlist(&self, playlist_id: i64, track_id: i64) -> Result<PlaylistTrack> {
        let mut tx = self.pool().begin().await?;

        let link = sqlx::query_as::<_, PlaylistTrack>(
            r#"
            INSERT INTO playlist_tracks (playlist_id, track_id)
            VALUES (?, ?)
            RETURNING playlist_id, track_id
            "#,
        )
        .bind(playlist_id)
        .bind(track_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(playlist_id, track_id, "Added track to playlist");
        Ok(link)
    }

    pub async fn remove_track_from_playlist(&self, playlist_id: i64, track_id: i64) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
            .bind(playlist_id)
            .bind(track_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Tracks of one playlist in track id order
    pub async fn list_playlist_tracks(&self, playlist_id: i64) -> Result<Vec<Track>> {
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT t.track_id, t.track_name, t.album_id, t.genre
            FROM playlist_tracks pt
            JOIN tracks t ON t.track_id = pt.track_id
            WHERE pt.playlist_id = ?
            ORDER BY t.track_id
            "#,
        )
        .bind(playlist_id)
        .fetch_all(self.pool())
        .await?;

        Ok(tracks)
    }
}
