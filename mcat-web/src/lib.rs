//! mcat-web library - music catalog web service
//!
//! HTML pages for browsing, sorting and filtering the catalog and the
//! popularity report, plus a JSON CRUD API under `/api`.

use axum::Router;
use mcat_common::CatalogStore;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub mod api;
pub mod error;
pub mod render;

pub use error::{ApiError, ApiResult, PageError};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog store handle (owns the connection pool)
    pub store: CatalogStore,
    /// Upper bound on handling one request
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(store: CatalogStore, request_timeout: Duration) -> Self {
        Self {
            store,
            request_timeout,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let pages = Router::new()
        .route("/", get(api::serve_index))
        .route("/tracks", get(api::tracks_page))
        .route("/tracks/sort", post(api::sort_tracks_page))
        .route("/tracks/filter", post(api::filter_tracks_page))
        .route("/report", get(api::report_page))
        .route("/report/sort", post(api::sort_report_page))
        .route("/browse/:table", get(api::browse_page));

    Router::new()
        .merge(pages)
        .nest("/api", api::catalog_routes())
        .merge(api::health_routes())
        .layer(TimeoutLayer::new(state.request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
