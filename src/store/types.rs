//! Core data types for loaded tables
//!
//! - `Value`: A single scalar cell as SQLite stores it
//! - `Row`: One record, aligned with the row set's columns
//! - `RowSet`: An ordered table snapshot loaded in one read

use serde::Serialize;
use std::fmt;

/// A single cell value
///
/// Mirrors SQLite's storage classes. The `Display` form is what equality
/// filters compare against and what CSV export writes. Integral reals keep
/// a trailing `.0` (`5.0`, not `5`), so they stay distinct from integers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Borrow the text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write_real(f, *r),
            Value::Text(s) => f.write_str(s),
            Value::Blob(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// Largest magnitude below which every integral f64 is exact
const EXACT_INTEGRAL_LIMIT: f64 = 9_007_199_254_740_992.0;

fn write_real(f: &mut fmt::Formatter<'_>, r: f64) -> fmt::Result {
    if r.is_finite() && r.fract() == 0.0 && r.abs() < EXACT_INTEGRAL_LIMIT {
        write!(f, "{:.1}", r)
    } else {
        write!(f, "{}", r)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

/// One record, positionally aligned with `RowSet::columns`
pub type Row = Vec<Value>;

/// An ordered snapshot of one table
///
/// Row order is the order SQLite returned them in; nothing in this crate
/// reorders rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RowSet {
    /// Create a row set
    ///
    /// # Panics
    /// Panics if any row's width differs from the number of columns
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        assert!(
            rows.iter().all(|r| r.len() == columns.len()),
            "RowSet: every row must have one value per column"
        );
        Self { columns, rows }
    }

    /// Create an empty row set with the given schema
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at (row, column name), if both exist
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Iterate over all values of one column in row order
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let col = self.column_index(column)?;
        Some(self.rows.iter().map(move |r| &r[col]))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Split into (columns, rows)
    pub fn into_parts(self) -> (Vec<String>, Vec<Row>) {
        (self.columns, self.rows)
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
