//! Genre persistence
//!
//! A genre's name is its own key. Genres are only created by seeding.

use super::{CatalogStore, Genre};
use crate::Result;

impl CatalogStore {
    /// Seed a genre; seeding an existing genre is a no-op
    pub async fn create_genre(&self, genre: &str) -> Result<Genre> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("INSERT OR IGNORE INTO genres (genre) VALUES (?)")
            .bind(genre)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Genre {
            genre: genre.to_string(),
        })
    }

    /// All genres, alphabetical
    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT genre FROM genres ORDER BY genre")
            .fetch_all(self.pool())
            .await?;

        Ok(genres)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::memory_store;
    use crate::db::DEFAULT_GENRES;

    #[tokio::test]
    async fn test_seed_genre_once() {
        let store = memory_store().await;

        store.create_genre("Shoegaze").await.unwrap();
        store.create_genre("Shoegaze").await.unwrap();

        let genres = store.list_genres().await.unwrap();
        assert_eq!(genres.len(), DEFAULT_GENRES.len() + 1);
        assert!(genres.iter().any(|g| g.genre == "Shoegaze"));

        let mut sorted = genres.clone();
        sorted.sort_by(|a, b| a.genre.cmp(&b.genre));
        assert_eq!(genres, sorted);
    }
}
