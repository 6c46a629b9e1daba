//! In-memory tables: named, typed columns plus rows aligned to them
//!
//! Tables are built from store records by [`project`], transformed by
//! [`apply`] and handed to the presentation layer as-is.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

mod projection;
mod query;

pub use projection::{project, ColumnSpec, Tabular};
pub use query::{apply, Direction, Operation};

use crate::{Error, Result};

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Text,
}

/// A single cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Text(String),
    Null,
}

impl Value {
    pub fn kind(&self) -> Option<ColumnKind> {
        match self {
            Value::Integer(_) => Some(ColumnKind::Integer),
            Value::Text(_) => Some(ColumnKind::Text),
            Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Natural ordering within one column: integers numerically, text
    /// byte-wise, nulls after every non-null value.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            // Mixed kinds never share a validated column
            (Value::Integer(_), Value::Text(_)) => Ordering::Less,
            (Value::Text(_), Value::Integer(_)) => Ordering::Greater,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Null => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Text(v) => serializer.serialize_str(v),
            Value::Null => serializer.serialize_none(),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
}

/// Ordered columns plus a row sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Zero-row table with the given columns
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom
    pub fn column_values(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Append a row after checking arity, kinds and nullability
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::Internal(format!(
                "Row has {} values but table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }

        for (column, value) in self.columns.iter().zip(&row) {
            match value.kind() {
                None if !column.nullable => {
                    return Err(Error::Internal(format!(
                        "Null value in non-nullable column '{}'",
                        column.name
                    )));
                }
                Some(kind) if kind != column.kind => {
                    return Err(Error::Internal(format!(
                        "Column '{}' expects {:?} but got {:?}",
                        column.name, column.kind, kind
                    )));
                }
                _ => {}
            }
        }

        self.rows.push(row);
        Ok(())
    }

    /// Same columns, different rows. Rows come from this table so they are already valid.
    fn with_rows(&self, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column {
                name: "id".to_string(),
                kind: ColumnKind::Integer,
                nullable: false,
            },
            Column {
                name: "name".to_string(),
                kind: ColumnKind::Text,
                nullable: true,
            },
        ]
    }

    #[test]
    fn test_push_row_checks_shape() {
        let mut table = Table::new(columns());

        table.push_row(vec![Value::Integer(1), "a".into()]).unwrap();
        table.push_row(vec![Value::Integer(2), Value::Null]).unwrap();

        assert!(table.push_row(vec![Value::Integer(3)]).is_err());
        assert!(table.push_row(vec!["x".into(), "y".into()]).is_err());
        assert!(table.push_row(vec![Value::Null, "y".into()]).is_err());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_nulls_order_last() {
        assert_eq!(Value::Null.compare(&Value::Integer(1)), Ordering::Greater);
        assert_eq!(Value::Text("a".into()).compare(&Value::Null), Ordering::Less);
        assert_eq!(Value::Integer(10).compare(&Value::Integer(9)), Ordering::Greater);
        // Numeric, not lexicographic
        assert_eq!(Value::Integer(2).compare(&Value::Integer(10)), Ordering::Less);
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let mut table = Table::new(columns());
        table.push_row(vec![Value::Integer(7), Value::Null]).unwrap();

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["columns"][0]["name"], "id");
        assert_eq!(json["columns"][0]["kind"], "integer");
        assert_eq!(json["rows"][0][0], 7);
        assert!(json["rows"][0][1].is_null());
    }
}
