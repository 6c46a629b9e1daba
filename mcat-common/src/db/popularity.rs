//! Playlist membership counts per (artist, track)

use super::{CatalogStore, TrackPopularity};
use crate::Result;

impl CatalogStore {
    /// One row per (artist, track) with its playlist membership count.
    ///
    /// Artists without tracks yield a single row with no track and count 0.
    /// Runs inside one read transaction so the snapshot is consistent.
    pub async fn track_popularity(&self) -> Result<Vec<TrackPopularity>> {
        let mut tx = self.pool().begin().await?;

        let rows = sqlx::query_as::<_, TrackPopularity>(
            r#"
            SELECT ar.artist_id,
                   ar.artist_name,
                   t.track_id,
                   t.track_name,
                   COUNT(pt.playlist_id) AS playlist_count
            FROM artists ar
            LEFT JOIN albums al ON al.artist_id = ar.artist_id
            LEFT JOIN tracks t ON t.album_id = al.album_id
            LEFT JOIN playlist_tracks pt ON pt.track_id = t.track_id
            GROUP BY ar.artist_id, ar.artist_name, t.track_id, t.track_name
            ORDER BY ar.artist_id, t.track_id
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rows)
    }
}
