//! Track table pages
//!
//! Sort and filter requests are validated against the track table's declared
//! columns before the store is touched, so an unknown attribute never reaches
//! a query.

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form,
};
use mcat_common::db::TrackListing;
use mcat_common::table::{apply, project, Tabular};
use mcat_common::{CatalogStore, Direction, Operation, Table};
use serde::Deserialize;
use tracing::debug;

use crate::render::{escape_html, filter_form, page, render_table, sort_form};
use crate::{AppState, PageError};

/// POST /tracks/sort form body
#[derive(Debug, Deserialize)]
pub struct SortForm {
    pub sort_attribute: String,
    pub order: String,
}

/// POST /tracks/filter form body
#[derive(Debug, Deserialize)]
pub struct FilterForm {
    pub filter_attribute: String,
    pub value: String,
}

/// Zero-row table carrying the track columns, used for request validation
fn track_columns() -> mcat_common::Result<Table> {
    project::<TrackListing>(&[], &TrackListing::column_spec())
}

async fn track_table(store: &CatalogStore) -> mcat_common::Result<Table> {
    let listings = store.list_track_listings().await?;
    project(&listings, &TrackListing::column_spec())
}

fn tracks_view(
    table: &Table,
    sorted_by: Option<(&str, Direction)>,
    note: Option<String>,
) -> Html<String> {
    let mut body = String::new();
    body.push_str(&sort_form("/tracks/sort", table, sorted_by));
    body.push_str(&filter_form("/tracks/filter", table));
    if let Some(note) = note {
        body.push_str(&format!(r#"<p class="meta">{}</p>"#, escape_html(&note)));
    }
    body.push_str(&render_table(table));
    page("Tracks", &body)
}

/// GET /tracks
pub async fn tracks_page(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let table = track_table(&state.store).await?;
    Ok(tracks_view(&table, None, None))
}

/// POST /tracks/sort
pub async fn sort_tracks_page(
    State(state): State<AppState>,
    form: Result<Form<SortForm>, FormRejection>,
) -> Result<Html<String>, PageError> {
    let Form(form) = form?;
    let operation = Operation::sort_from_request(&track_columns()?, &form.sort_attribute, &form.order)?;
    let sorted_by = match &operation {
        Operation::Sort { column, direction } => Some((column.as_str(), *direction)),
        Operation::FilterEq { .. } => None,
    };
    debug!(column = %form.sort_attribute, order = %form.order, "Sorting tracks");

    let table = apply(&track_table(&state.store).await?, &operation)?;
    Ok(tracks_view(&table, sorted_by, None))
}

/// POST /tracks/filter
pub async fn filter_tracks_page(
    State(state): State<AppState>,
    form: Result<Form<FilterForm>, FormRejection>,
) -> Result<Html<String>, PageError> {
    let Form(form) = form?;
    let operation =
        Operation::filter_from_request(&track_columns()?, &form.filter_attribute, &form.value)?;
    debug!(column = %form.filter_attribute, "Filtering tracks");

    let table = apply(&track_table(&state.store).await?, &operation)?;
    let note = format!("Showing rows where {} = {}", form.filter_attribute, form.value);
    Ok(tracks_view(&table, None, Some(note)))
}
