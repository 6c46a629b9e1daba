//! Sort and filter operations over tables
//!
//! Operations are a closed set of variants. Column names are checked against
//! the table's declared columns and directions parse into an enum, so nothing
//! from a request is ever spliced into a query string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ColumnKind, Table, Value};
use crate::{Error, Result};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Ascending),
            "desc" | "descending" => Ok(Direction::Descending),
            _ => Err(Error::Validation(format!(
                "Invalid sort order '{}': expected 'asc' or 'desc'",
                s
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => f.write_str("asc"),
            Direction::Descending => f.write_str("desc"),
        }
    }
}

/// A table transformation
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Sort { column: String, direction: Direction },
    FilterEq { column: String, value: Value },
}

impl Operation {
    /// Validate a raw sort request against `table`'s columns
    pub fn sort_from_request(table: &Table, column: &str, order: &str) -> Result<Self> {
        ensure_column(table, column)?;
        let direction = order.parse::<Direction>()?;

        Ok(Operation::Sort {
            column: column.to_string(),
            direction,
        })
    }

    /// Validate a raw equality filter; the value is parsed by the column's kind
    pub fn filter_from_request(table: &Table, column: &str, raw_value: &str) -> Result<Self> {
        let kind = ensure_column(table, column)?;

        let value = match kind {
            ColumnKind::Integer => raw_value
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| {
                    Error::Validation(format!(
                        "Column '{}' holds integers, got '{}'",
                        column, raw_value
                    ))
                })?,
            ColumnKind::Text => Value::Text(raw_value.to_string()),
        };

        Ok(Operation::FilterEq {
            column: column.to_string(),
            value,
        })
    }

    pub fn column(&self) -> &str {
        match self {
            Operation::Sort { column, .. } | Operation::FilterEq { column, .. } => column,
        }
    }
}

fn ensure_column(table: &Table, column: &str) -> Result<ColumnKind> {
    table.column(column).map(|c| c.kind).ok_or_else(|| {
        let allowed: Vec<&str> = table.column_names().collect();
        Error::Validation(format!(
            "Unknown column '{}': expected one of [{}]",
            column,
            allowed.join(", ")
        ))
    })
}

/// Apply `operation` to `table`, returning a new table
pub fn apply(table: &Table, operation: &Operation) -> Result<Table> {
    let index = table
        .column_index(operation.column())
        .ok_or_else(|| Error::Validation(format!("Unknown column '{}'", operation.column())))?;

    match operation {
        Operation::Sort { direction, .. } => {
            let mut rows = table.rows().to_vec();
            // slice::sort_by is stable, equal keys keep input order in both directions
            match direction {
                Direction::Ascending => rows.sort_by(|a, b| a[index].compare(&b[index])),
                Direction::Descending => rows.sort_by(|a, b| b[index].compare(&a[index])),
            }
            Ok(table.with_rows(rows))
        }
        Operation::FilterEq { value, .. } => {
            let column = &table.columns()[index];
            if let Some(kind) = value.kind() {
                if kind != column.kind {
                    return Err(Error::Validation(format!(
                        "Column '{}' holds {:?} values, filter value is {:?}",
                        column.name, column.kind, kind
                    )));
                }
            }

            let rows = table
                .rows()
                .iter()
                .filter(|row| &row[index] == value)
                .cloned()
                .collect();
            Ok(table.with_rows(rows))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{project, ColumnSpec};

    #[derive(Debug, Clone)]
    struct Row {
        id: i64,
        name: &'static str,
        plays: i64,
    }

    fn table() -> Table {
        let records = vec![
            Row { id: 1, name: "delta", plays: 10 },
            Row { id: 2, name: "alpha", plays: 2 },
            Row { id: 3, name: "charlie", plays: 10 },
            Row { id: 4, name: "bravo", plays: 7 },
            Row { id: 5, name: "alpha", plays: 10 },
        ];
        let spec = vec![
            ColumnSpec::integer("id", |r: &Row| r.id),
            ColumnSpec::text("name", |r: &Row| r.name.to_string()),
            ColumnSpec::integer("plays", |r: &Row| r.plays),
        ];
        project(&records, &spec).unwrap()
    }

    fn ids(table: &Table) -> Vec<i64> {
        table
            .column_values("id")
            .unwrap()
            .into_iter()
            .map(|v| match v {
                Value::Integer(id) => *id,
                other => panic!("unexpected id {:?}", other),
            })
            .collect()
    }

    fn sort(table: &Table, column: &str, order: &str) -> Table {
        let op = Operation::sort_from_request(table, column, order).unwrap();
        apply(table, &op).unwrap()
    }

    #[test]
    fn test_sort_numeric_is_stable() {
        let t = table();
        assert_eq!(ids(&sort(&t, "plays", "asc")), vec![2, 4, 1, 3, 5]);
        // Ties (plays = 10) stay in input order when descending too
        assert_eq!(ids(&sort(&t, "plays", "desc")), vec![1, 3, 5, 4, 2]);
    }

    #[test]
    fn test_sort_text() {
        let t = table();
        assert_eq!(ids(&sort(&t, "name", "ascending")), vec![2, 5, 4, 3, 1]);
        assert_eq!(ids(&sort(&t, "name", "DESC")), vec![1, 3, 4, 2, 5]);
    }

    #[test]
    fn test_sort_then_reverse_keeps_row_multiset() {
        let t = table();
        let round_trip = sort(&sort(&t, "name", "asc"), "name", "desc");

        let mut original = t.rows().to_vec();
        let mut result = round_trip.rows().to_vec();
        let key = |r: &Vec<Value>| format!("{:?}", r);
        original.sort_by_key(key);
        result.sort_by_key(key);
        assert_eq!(original, result);
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let t = table();
        let before = t.clone();
        let _ = sort(&t, "id", "desc");
        assert_eq!(t, before);
    }

    #[test]
    fn test_filter_partitions_rows() {
        let t = table();
        let op = Operation::filter_from_request(&t, "plays", "10").unwrap();
        let filtered = apply(&t, &op).unwrap();

        assert_eq!(ids(&filtered), vec![1, 3, 5]);
        let index = t.column_index("plays").unwrap();
        let excluded = t
            .rows()
            .iter()
            .filter(|row| !filtered.rows().contains(row))
            .count();
        assert_eq!(excluded + filtered.len(), t.len());
        assert!(filtered.rows().iter().all(|row| row[index] == Value::Integer(10)));
        assert!(t
            .rows()
            .iter()
            .filter(|row| !filtered.rows().contains(row))
            .all(|row| row[index] != Value::Integer(10)));
    }

    #[test]
    fn test_filter_text() {
        let t = table();
        let op = Operation::filter_from_request(&t, "name", "alpha").unwrap();
        assert_eq!(ids(&apply(&t, &op).unwrap()), vec![2, 5]);
    }

    #[test]
    fn test_unknown_column_rejected() {
        let t = table();
        let err = Operation::sort_from_request(&t, "name; DROP TABLE tracks", "asc").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = Operation::filter_from_request(&t, "missing", "1").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // Constructed directly, still refused by apply
        let op = Operation::Sort {
            column: "nope".to_string(),
            direction: Direction::Ascending,
        };
        assert!(matches!(apply(&t, &op), Err(Error::Validation(_))));
    }

    #[test]
    fn test_bad_direction_rejected() {
        let t = table();
        let err = Operation::sort_from_request(&t, "id", "asc, (SELECT 1)").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_filter_value_kind_checked() {
        let t = table();
        assert!(matches!(
            Operation::filter_from_request(&t, "plays", "ten"),
            Err(Error::Validation(_))
        ));

        let op = Operation::FilterEq {
            column: "plays".to_string(),
            value: Value::Text("10".to_string()),
        };
        assert!(matches!(apply(&t, &op), Err(Error::Validation(_))));
    }

    #[test]
    fn test_empty_table_is_fine() {
        let empty = Table::new(table().columns().to_vec());
        let op = Operation::sort_from_request(&empty, "name", "desc").unwrap();
        let sorted = apply(&empty, &op).unwrap();
        assert!(sorted.is_empty());
        assert_eq!(sorted.columns(), empty.columns());
    }
}
