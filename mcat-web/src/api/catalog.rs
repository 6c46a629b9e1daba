//! JSON CRUD API over the catalog
//!
//! Lists come back as `{"data": [...]}`, creates as 201 with the stored
//! record, deletes as 204. Referential checks are left to the store's foreign
//! keys; a violation surfaces as 400.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use mcat_common::db::{
    Album, Artist, EntityKind, Genre, Listener, NewTrack, Playlist, PlaylistTrack, Track,
    TrackUpdate,
};
use mcat_common::report::generate_report;
use mcat_common::Table;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

/// List response wrapper
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateArtistRequest {
    pub artist_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAlbumRequest {
    pub album_name: String,
    pub artist_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateListenerRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub playlist_name: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct AddPlaylistTrackRequest {
    pub track_id: i64,
}

fn found<T>(record: Option<T>, kind: EntityKind, id: i64) -> ApiResult<Json<T>> {
    record
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("{} {}", kind, id)))
}

fn removed(deleted: bool, kind: EntityKind, id: i64) -> ApiResult<StatusCode> {
    if deleted {
        info!("Deleted {} {}", kind, id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("{} {}", kind, id)))
    }
}

// Artists

pub async fn list_artists(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Artist>>> {
    Ok(Json(state.store.list_artists().await?.into()))
}

pub async fn create_artist(
    State(state): State<AppState>,
    payload: Result<Json<CreateArtistRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Artist>)> {
    let Json(payload) = payload?;
    let artist = state.store.create_artist(&payload.artist_name).await?;
    Ok((StatusCode::CREATED, Json(artist)))
}

pub async fn get_artist(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Artist>> {
    found(state.store.get_artist(id).await?, EntityKind::Artist, id)
}

pub async fn delete_artist(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    removed(state.store.delete_artist(id).await?, EntityKind::Artist, id)
}

// Albums

pub async fn list_albums(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Album>>> {
    Ok(Json(state.store.list_albums().await?.into()))
}

pub async fn create_album(
    State(state): State<AppState>,
    payload: Result<Json<CreateAlbumRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Album>)> {
    let Json(payload) = payload?;
    let album = state
        .store
        .create_album(&payload.album_name, payload.artist_id)
        .await?;
    Ok((StatusCode::CREATED, Json(album)))
}

pub async fn get_album(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Album>> {
    found(state.store.get_album(id).await?, EntityKind::Album, id)
}

pub async fn delete_album(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    removed(state.store.delete_album(id).await?, EntityKind::Album, id)
}

// Genres

pub async fn list_genres(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Genre>>> {
    Ok(Json(state.store.list_genres().await?.into()))
}

// Tracks

pub async fn list_tracks(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Track>>> {
    Ok(Json(state.store.list_tracks().await?.into()))
}

pub async fn create_track(
    State(state): State<AppState>,
    payload: Result<Json<NewTrack>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Track>)> {
    let Json(payload) = payload?;
    let track = state.store.create_track(&payload).await?;
    Ok((StatusCode::CREATED, Json(track)))
}

pub async fn get_track(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Track>> {
    found(state.store.get_track(id).await?, EntityKind::Track, id)
}

/// PATCH /api/tracks/:id
///
/// Fields absent from the body keep their stored value.
pub async fn update_track(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    update: Result<Json<TrackUpdate>, JsonRejection>,
) -> ApiResult<Json<Track>> {
    let Json(update) = update?;
    found(state.store.update_track(id, &update).await?, EntityKind::Track, id)
}

pub async fn delete_track(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    removed(state.store.delete_track(id).await?, EntityKind::Track, id)
}

// Listeners

pub async fn list_listeners(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Listener>>> {
    Ok(Json(state.store.list_listeners().await?.into()))
}

pub async fn create_listener(
    State(state): State<AppState>,
    payload: Result<Json<CreateListenerRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Listener>)> {
    let Json(payload) = payload?;
    let listener = state.store.create_listener(&payload.username).await?;
    Ok((StatusCode::CREATED, Json(listener)))
}

pub async fn get_listener(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Listener>> {
    found(state.store.get_listener(id).await?, EntityKind::Listener, id)
}

pub async fn delete_listener(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    removed(state.store.delete_listener(id).await?, EntityKind::Listener, id)
}

// Playlists

pub async fn list_playlists(State(state): State<AppState>) -> ApiResult<Json<ListResponse<Playlist>>> {
    Ok(Json(state.store.list_playlists().await?.into()))
}

pub async fn create_playlist(
    State(state): State<AppState>,
    payload: Result<Json<CreatePlaylistRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Playlist>)> {
    let Json(payload) = payload?;
    let playlist = state
        .store
        .create_playlist(&payload.playlist_name, payload.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(playlist)))
}

pub async fn get_playlist(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Playlist>> {
    found(state.store.get_playlist(id).await?, EntityKind::Playlist, id)
}

pub async fn delete_playlist(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    removed(state.store.delete_playlist(id).await?, EntityKind::Playlist, id)
}

async fn require_playlist(state: &AppState, playlist_id: i64) -> ApiResult<()> {
    match state.store.get_playlist(playlist_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::NotFound(format!(
            "{} {}",
            EntityKind::Playlist,
            playlist_id
        ))),
    }
}

/// GET /api/playlists/:id/tracks
pub async fn list_playlist_tracks(
    State(state): State<AppState>,
    Path(playlist_id): Path<i64>,
) -> ApiResult<Json<ListResponse<Track>>> {
    require_playlist(&state, playlist_id).await?;
    Ok(Json(state.store.list_playlist_tracks(playlist_id).await?.into()))
}

/// POST /api/playlists/:id/tracks
pub async fn add_playlist_track(
    State(state): State<AppState>,
    Path(playlist_id): Path<i64>,
    payload: Result<Json<AddPlaylistTrackRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PlaylistTrack>)> {
    let Json(payload) = payload?;
    require_playlist(&state, playlist_id).await?;
    let membership = state
        .store
        .add_track_to_playlist(playlist_id, payload.track_id)
        .await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

/// DELETE /api/playlists/:id/tracks/:track_id
pub async fn remove_playlist_track(
    State(state): State<AppState>,
    Path((playlist_id, track_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let deleted = state
        .store
        .remove_track_from_playlist(playlist_id, track_id)
        .await?;
    removed(deleted, EntityKind::PlaylistTrack, track_id)
}

// Report

/// GET /api/report
pub async fn get_report(State(state): State<AppState>) -> ApiResult<Json<Table>> {
    Ok(Json(generate_report(&state.store).await?))
}

/// Build catalog routes, nested under `/api`
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/artists", get(list_artists).post(create_artist))
        .route("/artists/:id", get(get_artist).delete(delete_artist))
        .route("/albums", get(list_albums).post(create_album))
        .route("/albums/:id", get(get_album).delete(delete_album))
        .route("/genres", get(list_genres))
        .route("/tracks", get(list_tracks).post(create_track))
        .route(
            "/tracks/:id",
            get(get_track).patch(update_track).delete(delete_track),
        )
        .route("/listeners", get(list_listeners).post(create_listener))
        .route("/listeners/:id", get(get_listener).delete(delete_listener))
        .route("/playlists", get(list_playlists).post(create_playlist))
        .route("/playlists/:id", get(get_playlist).delete(delete_playlist))
        .route(
            "/playlists/:id/tracks",
            get(list_playlist_tracks).post(add_playlist_track),
        )
        .route(
            "/playlists/:id/tracks/:track_id",
            delete(remove_playlist_track),
        )
        .route("/report", get(get_report))
}
