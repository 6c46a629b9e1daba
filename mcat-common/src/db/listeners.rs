//! Listener persistence

use tracing::debug;

use super::{CatalogStore, Listener};
use crate::Result;

impl CatalogStore {
    /// Insert a new listener; the username must be unique
    pub async fn create_listener(&self, username: &str) -> Result<Listener> {
        let mut tx = self.pool().begin().await?;

        let listener = sqlx::query_as::<_, Listener>(
            r#"
            INSERT INTO listeners (username)
            VALUES (?)
            RETURNING user_id, username
            "#,
        )
        .bind(username)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(user_id = listener.user_id, "Created listener");
        Ok(listener)
    }

    pub async fn get_listener(&self, user_id: i64) -> Result<Option<Listener>> {
        let listener = sqlx::query_as::<_, Listener>(
            "SELECT user_id, username FROM listeners WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(listener)
    }

    pub async fn list_listeners(&self) -> Result<Vec<Listener>> {
        let listeners = sqlx::query_as::<_, Listener>(
            "SELECT user_id, username FROM listeners ORDER BY user_id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(listeners)
    }

    pub async fn delete_listener(&self, user_id: i64) -> Result<bool> {
        let mut tx = self.pool().begin().await?;

        let result = sqlx::query("DELETE FROM listeners WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
