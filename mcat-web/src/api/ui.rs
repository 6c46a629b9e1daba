//! Index page

use axum::{extract::State, response::Html};
use mcat_common::db::EntityKind;
use std::fmt::Write;

use super::browse::BROWSABLE;
use crate::render::{escape_html, page};
use crate::{AppState, PageError};

/// GET /
///
/// Row counts for every entity kind plus links to the table views.
pub async fn serve_index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let mut rows = String::new();
    for kind in EntityKind::ALL {
        let count = state.store.count(kind).await?;
        let name = escape_html(kind.table_name());
        let label = if BROWSABLE.contains(&kind) {
            format!(r#"<a href="/browse/{name}">{name}</a>"#)
        } else {
            name
        };
        let _ = writeln!(rows, "<tr><td>{}</td><td>{}</td></tr>", label, count);
    }

    let body = format!(
        r#"<p class="meta">Catalog contents</p>
<table>
<thead><tr><th>table</th><th>rows</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
<p class="meta" style="margin-top: 16px"><a href="/tracks">Browse tracks</a> · <a href="/report">Most popular track per artist</a></p>
"#
    );

    Ok(page("Music catalog", &body))
}
