//! Record sequences to tables

use super::{Column, ColumnKind, Table, Value};
use crate::db::{Album, Artist, Genre, Listener, Playlist, Track, TrackListing};
use crate::{Error, Result};

type Accessor<R> = Box<dyn Fn(&R) -> Option<Value> + Send + Sync>;

/// How to pull one column out of a record.
///
/// The accessor returns `None` when the record lacks the field, which aborts
/// the whole projection. A present-but-empty field is `Some(Value::Null)`.
pub struct ColumnSpec<R> {
    column: Column,
    accessor: Accessor<R>,
}

impl<R> ColumnSpec<R> {
    pub fn new<F>(name: &str, kind: ColumnKind, nullable: bool, accessor: F) -> Self
    where
        F: Fn(&R) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            column: Column {
                name: name.to_string(),
                kind,
                nullable,
            },
            accessor: Box::new(accessor),
        }
    }

    /// Non-nullable integer column
    pub fn integer<F>(name: &str, accessor: F) -> Self
    where
        F: Fn(&R) -> i64 + Send + Sync + 'static,
    {
        Self::new(name, ColumnKind::Integer, false, move |r| Some(Value::Integer(accessor(r))))
    }

    /// Non-nullable text column
    pub fn text<F>(name: &str, accessor: F) -> Self
    where
        F: Fn(&R) -> String + Send + Sync + 'static,
    {
        Self::new(name, ColumnKind::Text, false, move |r| Some(Value::Text(accessor(r))))
    }

    pub fn column(&self) -> &Column {
        &self.column
    }
}

/// Records with a default column layout
pub trait Tabular: Sized {
    fn column_spec() -> Vec<ColumnSpec<Self>>;
}

/// Build a table from records.
///
/// Empty input gives a zero-row table that still carries every declared column.
pub fn project<R>(records: &[R], spec: &[ColumnSpec<R>]) -> Result<Table> {
    let mut table = Table::new(spec.iter().map(|s| s.column.clone()).collect());

    for (index, record) in records.iter().enumerate() {
        let mut row = Vec::with_capacity(spec.len());
        for column_spec in spec {
            let value = (column_spec.accessor)(record).ok_or_else(|| {
                Error::Internal(format!(
                    "Record {} is missing field '{}'",
                    index, column_spec.column.name
                ))
            })?;
            row.push(value);
        }
        table.push_row(row)?;
    }

    Ok(table)
}

impl Tabular for Artist {
    fn column_spec() -> Vec<ColumnSpec<Self>> {
        vec![
            ColumnSpec::integer("artist_id", |a: &Artist| a.artist_id),
            ColumnSpec::text("artist_name", |a: &Artist| a.artist_name.clone()),
        ]
    }
}

impl Tabular for Album {
    fn column_spec() -> Vec<ColumnSpec<Self>> {
        vec![
            ColumnSpec::integer("album_id", |a: &Album| a.album_id),
            ColumnSpec::text("album_name", |a: &Album| a.album_name.clone()),
            ColumnSpec::integer("artist_id", |a: &Album| a.artist_id),
        ]
    }
}

impl Tabular for Genre {
    fn column_spec() -> Vec<ColumnSpec<Self>> {
        vec![ColumnSpec::text("genre", |g: &Genre| g.genre.clone())]
    }
}

impl Tabular for Track {
    fn column_spec() -> Vec<ColumnSpec<Self>> {
        vec![
            ColumnSpec::integer("track_id", |t: &Track| t.track_id),
            ColumnSpec::text("track_name", |t: &Track| t.track_name.clone()),
            ColumnSpec::integer("album_id", |t: &Track| t.album_id),
            ColumnSpec::text("genre", |t: &Track| t.genre.clone()),
        ]
    }
}

impl Tabular for TrackListing {
    fn column_spec() -> Vec<ColumnSpec<Self>> {
        vec![
            ColumnSpec::integer("track_id", |t: &TrackListing| t.track_id),
            ColumnSpec::text("track_name", |t: &TrackListing| t.track_name.clone()),
            ColumnSpec::integer("album_id", |t: &TrackListing| t.album_id),
            ColumnSpec::integer("artist_id", |t: &TrackListing| t.artist_id),
            ColumnSpec::text("genre", |t: &TrackListing| t.genre.clone()),
        ]
    }
}

impl Tabular for Listener {
    fn column_spec() -> Vec<ColumnSpec<Self>> {
        vec![
            ColumnSpec::integer("user_id", |l: &Listener| l.user_id),
            ColumnSpec::text("username", |l: &Listener| l.username.clone()),
        ]
    }
}

impl Tabular for Playlist {
    fn column_spec() -> Vec<ColumnSpec<Self>> {
        vec![
            ColumnSpec::integer("playlist_id", |p: &Playlist| p.playlist_id),
            ColumnSpec::text("playlist_name", |p: &Playlist| p.playlist_name.clone()),
            ColumnSpec::integer("user_id", |p: &Playlist| p.user_id),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value as Json};

    fn listing(track_id: i64, name: &str) -> TrackListing {
        TrackListing {
            track_id,
            track_name: name.to_string(),
            album_id: 1,
            artist_id: 1,
            genre: "Jazz".to_string(),
        }
    }

    #[test]
    fn test_empty_input_keeps_columns() {
        let table = project::<TrackListing>(&[], &TrackListing::column_spec()).unwrap();

        assert!(table.is_empty());
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["track_id", "track_name", "album_id", "artist_id", "genre"]);
    }

    #[test]
    fn test_rows_align_with_columns() {
        let records = vec![listing(1, "So What"), listing(2, "Blue in Green")];
        let table = project(&records, &TrackListing::column_spec()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][0], Value::Integer(2));
        assert_eq!(table.rows()[1][1], Value::Text("Blue in Green".to_string()));
        assert_eq!(table.rows()[1][4], Value::Text("Jazz".to_string()));
    }

    fn json_spec() -> Vec<ColumnSpec<Json>> {
        vec![
            ColumnSpec::new("id", ColumnKind::Integer, false, |r: &Json| {
                r.get("id").and_then(Json::as_i64).map(Value::Integer)
            }),
            ColumnSpec::new("name", ColumnKind::Text, false, |r: &Json| {
                r.get("name").and_then(Json::as_str).map(Value::from)
            }),
        ]
    }

    #[test]
    fn test_missing_field_fails_construction() {
        let records = vec![json!({"id": 1, "name": "ok"}), json!({"id": 2})];

        let err = project(&records, &json_spec()).unwrap_err();
        assert!(matches!(err, Error::Internal(ref msg) if msg.contains("'name'")));
    }

    #[test]
    fn test_wrong_kind_fails_construction() {
        let spec = vec![ColumnSpec::new("id", ColumnKind::Integer, false, |r: &Json| {
            r.get("id").and_then(Json::as_str).map(Value::from)
        })];

        assert!(project(&[json!({"id": "seven"})], &spec).is_err());
    }
}
