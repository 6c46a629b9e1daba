//! Database initialization
//!
//! Creates the database file on first run, applies connection pragmas to
//! every pooled connection and creates the catalog tables idempotently.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Genres seeded on every start (genres have no create endpoint)
pub const DEFAULT_GENRES: [&str; 12] = [
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Hip Hop",
    "Jazz",
    "Metal",
    "Pop",
    "R&B",
    "Reggae",
    "Rock",
];

/// Open (creating if needed) the on-disk catalog database
pub async fn init_database(db_path: &Path, busy_timeout: Duration) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Pragmas go on the connect options so every pooled connection gets them
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }
    info!("Database busy timeout set to {} ms", busy_timeout.as_millis());

    create_schema(&pool).await?;
    Ok(pool)
}

/// Private in-memory catalog, used by tests and throwaway runs.
///
/// Every connection to `sqlite::memory:` is a separate database, so the pool
/// is pinned to one connection that is never recycled.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    Ok(pool)
}

/// Create every catalog table and seed genres (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_artists_table(pool).await?;
    create_listeners_table(pool).await?;
    create_genres_table(pool).await?;
    create_albums_table(pool).await?;
    create_tracks_table(pool).await?;
    create_playlists_table(pool).await?;
    create_playlist_tracks_table(pool).await?;
    seed_genres(pool).await?;
    Ok(())
}

pub async fn create_artists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS artists (
            artist_id INTEGER PRIMARY KEY AUTOINCREMENT,
            artist_name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_listeners_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS listeners (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_genres_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS genres (
            genre TEXT PRIMARY KEY
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_albums_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS albums (
            album_id INTEGER PRIMARY KEY AUTOINCREMENT,
            album_name TEXT NOT NULL,
            artist_id INTEGER NOT NULL REFERENCES artists(artist_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_albums_artist ON albums(artist_id)")
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn create_tracks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            track_id INTEGER PRIMARY KEY AUTOINCREMENT,
            track_name TEXT NOT NULL,
            album_id INTEGER NOT NULL REFERENCES albums(album_id),
            genre TEXT NOT NULL REFERENCES genres(genre)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tracks_album ON tracks(album_id)")
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn create_playlists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlists (
            playlist_id INTEGER PRIMARY KEY AUTOINCREMENT,
            playlist_name TEXT NOT NULL,
            user_id INTEGER NOT NULL REFERENCES listeners(user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_playlist_tracks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlist_tracks (
            playlist_id INTEGER NOT NULL REFERENCES playlists(playlist_id) ON DELETE CASCADE,
            track_id INTEGER NOT NULL REFERENCES tracks(track_id) ON DELETE CASCADE,
            PRIMARY KEY (playlist_id, track_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_playlist_tracks_track ON playlist_tracks(track_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn seed_genres(pool: &SqlitePool) -> Result<()> {
    for genre in DEFAULT_GENRES {
        sqlx::query("INSERT OR IGNORE INTO genres (genre) VALUES (?)")
            .bind(genre)
            .execute(pool)
            .await?;
    }

    Ok(())
}
