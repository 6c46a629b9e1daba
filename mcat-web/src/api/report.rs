//! Popularity report pages

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form,
};
use mcat_common::report::{build_report, generate_report};
use mcat_common::table::apply;
use mcat_common::{Direction, Operation, Table};

use super::tracks::SortForm;
use crate::render::{page, render_table, sort_form};
use crate::{AppState, PageError};

fn report_view(table: &Table, sorted_by: Option<(&str, Direction)>) -> Html<String> {
    let mut body = String::new();
    body.push_str(&sort_form("/report/sort", table, sorted_by));
    body.push_str(&render_table(table));
    page("Most popular track per artist", &body)
}

/// GET /report
pub async fn report_page(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let table = generate_report(&state.store).await?;
    Ok(report_view(&table, None))
}

/// POST /report/sort
pub async fn sort_report_page(
    State(state): State<AppState>,
    form: Result<Form<SortForm>, FormRejection>,
) -> Result<Html<String>, PageError> {
    let Form(form) = form?;
    let operation = Operation::sort_from_request(&build_report(&[])?, &form.sort_attribute, &form.order)?;
    let sorted_by = match &operation {
        Operation::Sort { column, direction } => Some((column.as_str(), *direction)),
        Operation::FilterEq { .. } => None,
    };

    let table = apply(&generate_report(&state.store).await?, &operation)?;
    Ok(report_view(&table, sorted_by))
}
