//! HTML presentation
//!
//! Every value interpolated into markup goes through [`escape_html`]; artist,
//! track and playlist names are user supplied.

use axum::{http::StatusCode, response::Html};
use mcat_common::{Direction, Table};
use std::fmt::Write;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }
        header {
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
            margin-bottom: 20px;
        }
        h1 { font-size: 26px; color: #4a9eff; }
        nav a { color: #888; margin-right: 16px; text-decoration: none; }
        nav a:hover { color: #4a9eff; }
        .container { padding: 0 20px 20px; }
        form { display: inline-block; margin: 0 20px 16px 0; }
        select, input, button {
            background: #2a2a2a; color: #e0e0e0;
            border: 1px solid #3a3a3a; padding: 4px 8px;
        }
        table { border-collapse: collapse; width: 100%; }
        th, td { border-bottom: 1px solid #3a3a3a; padding: 6px 10px; text-align: left; }
        th { color: #4a9eff; font-weight: 600; }
        td.null { color: #666; font-style: italic; }
        .meta { color: #888; margin-bottom: 12px; }
        .error { color: #ff6b6b; font-size: 18px; }
"#;

/// Wrap `body` (already escaped markup) into a full page
pub fn page(title: &str, body: &str) -> Html<String> {
    let title = escape_html(title);
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - mcat</title>
    <style>{STYLE}</style>
</head>
<body>
    <header>
        <h1>{title}</h1>
        <nav><a href="/">Home</a><a href="/tracks">Tracks</a><a href="/report">Popularity report</a></nav>
    </header>
    <div class="container">
{body}
    </div>
</body>
</html>
"#
    ))
}

/// Render a table as `<table>` markup
pub fn render_table(table: &Table) -> String {
    let mut html = String::new();
    let _ = writeln!(html, r#"<p class="meta">{} rows</p>"#, table.len());
    html.push_str("<table>\n<thead><tr>");
    for column in table.columns() {
        let _ = write!(html, "<th>{}</th>", escape_html(&column.name));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in table.rows() {
        html.push_str("<tr>");
        for value in row {
            if value.is_null() {
                html.push_str(r#"<td class="null">none</td>"#);
            } else {
                let _ = write!(html, "<td>{}</td>", escape_html(&value.to_string()));
            }
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

fn column_options(table: &Table, selected: Option<&str>) -> String {
    let mut options = String::new();
    for name in table.column_names() {
        let name = escape_html(name);
        let marker = if Some(name.as_str()) == selected { " selected" } else { "" };
        let _ = write!(options, r#"<option value="{name}"{marker}>{name}</option>"#);
    }
    options
}

/// Sort form; only the table's own columns are offered
pub fn sort_form(action: &str, table: &Table, current: Option<(&str, Direction)>) -> String {
    let (selected, direction) = match current {
        Some((column, direction)) => (Some(column), direction),
        None => (None, Direction::Ascending),
    };
    let asc = if direction == Direction::Ascending { " selected" } else { "" };
    let desc = if direction == Direction::Descending { " selected" } else { "" };

    format!(
        r#"<form method="post" action="{action}">
    <label>Sort by <select name="sort_attribute">{options}</select></label>
    <select name="order"><option value="asc"{asc}>ascending</option><option value="desc"{desc}>descending</option></select>
    <button type="submit">Sort</button>
</form>
"#,
        action = escape_html(action),
        options = column_options(table, selected),
    )
}

/// Equality filter form
pub fn filter_form(action: &str, table: &Table) -> String {
    format!(
        r#"<form method="post" action="{action}">
    <label>Show rows where <select name="filter_attribute">{options}</select></label>
    <label>= <input type="text" name="value" required></label>
    <button type="submit">Filter</button>
</form>
"#,
        action = escape_html(action),
        options = column_options(table, None),
    )
}

/// Error page body for a failed request
pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let body = format!(
        r#"<p class="error">{} {}</p>
<p class="meta">{}</p>"#,
        status.as_u16(),
        escape_html(status.canonical_reason().unwrap_or("Error")),
        escape_html(message)
    );
    page("Error", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcat_common::{ColumnKind, ColumnSpec, Value};

    struct Named(&'static str);

    fn table(names: &[&'static str]) -> Table {
        let records: Vec<Named> = names.iter().map(|n| Named(*n)).collect();
        let spec = vec![
            ColumnSpec::text("name", |n: &Named| n.0.to_string()),
            ColumnSpec::new("note", ColumnKind::Text, true, |_: &Named| Some(Value::Null)),
        ];
        mcat_common::table::project(&records, &spec).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#x27;y&#x27;"
        );
        assert_eq!(escape_html("Plain Name"), "Plain Name");
    }

    #[test]
    fn test_table_cells_are_escaped() {
        let html = render_table(&table(&["<b>Bold</b>", "Tom & Jerry"]));

        assert!(html.contains("<td>&lt;b&gt;Bold&lt;/b&gt;</td>"));
        assert!(html.contains("<td>Tom &amp; Jerry</td>"));
        assert!(!html.contains("<b>Bold</b>"));
        assert!(html.contains(r#"<td class="null">none</td>"#));
    }

    #[test]
    fn test_sort_form_offers_only_declared_columns() {
        let form = sort_form("/tracks/sort", &table(&[]), Some(("note", Direction::Descending)));

        assert!(form.contains(r#"<option value="name">name</option>"#));
        assert!(form.contains(r#"<option value="note" selected>note</option>"#));
        assert!(form.contains(r#"<option value="desc" selected>"#));
        assert_eq!(form.matches("<option value=\"n").count(), 2);
    }

    #[test]
    fn test_page_escapes_title() {
        let Html(html) = page("<Tracks>", "<p>ok</p>");
        assert!(html.contains("<h1>&lt;Tracks&gt;</h1>"));
        assert!(html.contains("<p>ok</p>"));
    }
}
