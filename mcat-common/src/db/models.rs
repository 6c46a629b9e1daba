//! Database models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every persisted entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Artist,
    Album,
    Track,
    Genre,
    Listener,
    Playlist,
    PlaylistTrack,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Artist,
        EntityKind::Album,
        EntityKind::Track,
        EntityKind::Genre,
        EntityKind::Listener,
        EntityKind::Playlist,
        EntityKind::PlaylistTrack,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::Artist => "artists",
            EntityKind::Album => "albums",
            EntityKind::Track => "tracks",
            EntityKind::Genre => "genres",
            EntityKind::Listener => "listeners",
            EntityKind::Playlist => "playlists",
            EntityKind::PlaylistTrack => "playlist_tracks",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Artist => "artist",
            EntityKind::Album => "album",
            EntityKind::Track => "track",
            EntityKind::Genre => "genre",
            EntityKind::Listener => "listener",
            EntityKind::Playlist => "playlist",
            EntityKind::PlaylistTrack => "playlist track",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Artist {
    pub artist_id: i64,
    pub artist_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Album {
    pub album_id: i64,
    pub album_name: String,
    pub artist_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Genre {
    pub genre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Track {
    pub track_id: i64,
    pub track_name: String,
    pub album_id: i64,
    pub genre: String,
}

/// Fields required to create a track
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrack {
    pub track_name: String,
    pub album_id: i64,
    pub genre: String,
}

/// Partial track update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackUpdate {
    pub track_name: Option<String>,
    pub album_id: Option<i64>,
    pub genre: Option<String>,
}

/// Track with its artist resolved through the album
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrackListing {
    pub track_id: i64,
    pub track_name: String,
    pub album_id: i64,
    pub artist_id: i64,
    pub genre: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listener {
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Playlist {
    pub playlist_id: i64,
    pub playlist_name: String,
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlaylistTrack {
    pub playlist_id: i64,
    pub track_id: i64,
}

/// Per-(artist, track) membership count feeding the popularity report.
///
/// `track_id`/`track_name` are `None` for artists without any track.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TrackPopularity {
    pub artist_id: i64,
    pub artist_name: String,
    pub track_id: Option<i64>,
    pub track_name: Option<String>,
    pub playlist_count: i64,
}
