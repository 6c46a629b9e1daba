//! Read-only table view for each entity kind

use axum::{
    extract::{Path, State},
    response::Html,
};
use mcat_common::db::EntityKind;
use mcat_common::table::{project, Tabular};
use mcat_common::Table;

use crate::render::{page, render_table};
use crate::{ApiError, AppState, PageError};

/// Entity kinds with a browse page, keyed by table name
pub const BROWSABLE: [EntityKind; 6] = [
    EntityKind::Artist,
    EntityKind::Album,
    EntityKind::Genre,
    EntityKind::Track,
    EntityKind::Listener,
    EntityKind::Playlist,
];

fn listing<R: Tabular>(records: Vec<R>) -> mcat_common::Result<Table> {
    project(&records, &R::column_spec())
}

/// GET /browse/:table
pub async fn browse_page(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
) -> Result<Html<String>, PageError> {
    let kind = BROWSABLE
        .into_iter()
        .find(|k| k.table_name() == table_name)
        .ok_or_else(|| ApiError::NotFound(format!("No table named '{}'", table_name)))?;

    let store = &state.store;
    let table = match kind {
        EntityKind::Artist => listing(store.list_artists().await?)?,
        EntityKind::Album => listing(store.list_albums().await?)?,
        EntityKind::Genre => listing(store.list_genres().await?)?,
        EntityKind::Track => listing(store.list_tracks().await?)?,
        EntityKind::Listener => listing(store.list_listeners().await?)?,
        EntityKind::Playlist => listing(store.list_playlists().await?)?,
        EntityKind::PlaylistTrack => {
            return Err(ApiError::NotFound(format!("No table named '{}'", table_name)).into())
        }
    };

    Ok(page(kind.table_name(), &render_table(&table)))
}
