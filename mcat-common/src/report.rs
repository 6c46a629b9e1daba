//! Popularity report: each artist's most playlisted track
//!
//! Zero policy: an artist without tracks is reported once with no track and a
//! count of 0. An artist whose tracks are in no playlist is reported with a
//! count of 0, and the tie rule still applies, so every one of its tracks gets
//! a row.
//!
//! Tie rule: when several of an artist's tracks share the highest count, each
//! of them gets its own row and the artist name repeats.

use std::collections::BTreeMap;
use tracing::{debug, error};

use crate::db::{CatalogStore, TrackPopularity};
use crate::table::{project, ColumnKind, ColumnSpec, Table, Value};
use crate::Result;

pub const ARTIST_NAME: &str = "artist_name";
pub const MOST_POPULAR_TRACK: &str = "most_popular_track";
pub const PLAYLIST_COUNT: &str = "playlist_count";

/// One output row of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularityEntry {
    pub artist_name: String,
    pub most_popular_track: Option<String>,
    pub playlist_count: i64,
}

fn report_spec() -> Vec<ColumnSpec<PopularityEntry>> {
    vec![
        ColumnSpec::text(ARTIST_NAME, |e: &PopularityEntry| e.artist_name.clone()),
        ColumnSpec::new(MOST_POPULAR_TRACK, ColumnKind::Text, true, |e: &PopularityEntry| {
            Some(Value::from(e.most_popular_track.clone()))
        }),
        ColumnSpec::integer(PLAYLIST_COUNT, |e: &PopularityEntry| e.playlist_count),
    ]
}

/// Pick each artist's winning track(s).
///
/// Artists come out in id order, tied tracks in track id order.
pub fn most_popular_per_artist(rows: &[TrackPopularity]) -> Vec<PopularityEntry> {
    let mut by_artist: BTreeMap<i64, (&str, Vec<&TrackPopularity>)> = BTreeMap::new();
    for row in rows {
        let entry = by_artist
            .entry(row.artist_id)
            .or_insert_with(|| (row.artist_name.as_str(), Vec::new()));
        if row.track_id.is_some() {
            entry.1.push(row);
        }
    }

    let mut entries = Vec::new();
    for (artist_name, mut tracks) in by_artist.into_values() {
        let Some(max) = tracks.iter().map(|t| t.playlist_count).max() else {
            entries.push(PopularityEntry {
                artist_name: artist_name.to_string(),
                most_popular_track: None,
                playlist_count: 0,
            });
            continue;
        };

        tracks.sort_by_key(|t| t.track_id);
        entries.extend(tracks.into_iter().filter(|t| t.playlist_count == max).map(|t| {
            PopularityEntry {
                artist_name: artist_name.to_string(),
                most_popular_track: t.track_name.clone(),
                playlist_count: max,
            }
        }));
    }

    entries
}

/// Report table from already-fetched popularity rows
pub fn build_report(rows: &[TrackPopularity]) -> Result<Table> {
    project(&most_popular_per_artist(rows), &report_spec())
}

/// Generate the report from the store.
///
/// Either the full table is returned or the store error is; never a partial table.
pub async fn generate_report(store: &CatalogStore) -> Result<Table> {
    let rows = store.track_popularity().await.map_err(|e| {
        error!("Popularity aggregation failed: {}", e);
        e
    })?;

    let table = build_report(&rows)?;
    debug!(rows = table.len(), "Generated popularity report");
    Ok(table)
}
