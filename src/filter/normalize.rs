//! Date Normalizer
//!
//! Source tables store dates as free text, often in more than one format
//! within the same column. The normalizer tries a prioritized list of
//! formats per value and keeps the first successful parse. Values that match
//! nothing become `None`; they are never guessed.

use crate::filter::{FilterError, FilterResult};
use crate::store::{Row, RowSet, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format list entry that selects RFC 3339 parsing instead of strftime
const RFC3339: &str = "rfc3339";

/// Default formats in priority order
///
/// Day-first forms come before month-first ones, so `01/02/2023` is the
/// first of February. `%m/%d/%Y` only catches text the day-first form
/// rejects, such as `02/15/2023`.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%m/%d/%Y",
    RFC3339,
];

/// Parses date text with an ordered list of accepted formats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateNormalizer {
    formats: Vec<String>,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS.iter().copied())
    }
}

impl DateNormalizer {
    /// Create a normalizer with formats in priority order
    ///
    /// Entries are strftime patterns; the literal `rfc3339` selects RFC 3339.
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Parse one piece of text, first matching format wins
    pub fn parse_text(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.formats.iter().find_map(|fmt| parse_with(text, fmt))
    }

    /// Parse a cell value; only text can hold a date
    pub fn parse_value(&self, value: &Value) -> Option<NaiveDate> {
        value.as_text().and_then(|t| self.parse_text(t))
    }

    /// Normalize one column, producing exactly one outcome per row
    pub fn normalize_column(
        &self,
        rows: &RowSet,
        column: &str,
    ) -> FilterResult<Vec<Option<NaiveDate>>> {
        let values = rows
            .column_values(column)
            .ok_or_else(|| FilterError::UnknownDateColumn(column.to_string()))?;

        Ok(values.map(|v| self.parse_value(v)).collect())
    }

    /// Attach a normalized date column to a row set
    pub fn attach(&self, rows: RowSet, column: &str) -> FilterResult<DatedRows> {
        let dates = self.normalize_column(&rows, column)?;
        let unparsed = dates.iter().filter(|d| d.is_none()).count();
        if unparsed > 0 {
            tracing::debug!(
                column = %column,
                unparsed,
                total = dates.len(),
                "Rows with unparseable dates will be excluded"
            );
        }

        Ok(DatedRows {
            rows,
            date_column: column.to_string(),
            dates,
        })
    }
}

fn parse_with(text: &str, fmt: &str) -> Option<NaiveDate> {
    if fmt == RFC3339 {
        return DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.date_naive());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
        return Some(dt.date());
    }

    NaiveDate::parse_from_str(text, fmt).ok()
}

/// A row set with its parallel normalized date column
///
/// `dates[i]` belongs to `rows.rows()[i]`. The normalized column is never
/// part of `rows.columns()`, so dropping it is just `into_rows`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedRows {
    rows: RowSet,
    date_column: String,
    dates: Vec<Option<NaiveDate>>,
}

impl DatedRows {
    pub(crate) fn from_parts(
        columns: Vec<String>,
        rows: Vec<Row>,
        date_column: String,
        dates: Vec<Option<NaiveDate>>,
    ) -> Self {
        debug_assert_eq!(rows.len(), dates.len());
        Self {
            rows: RowSet::new(columns, rows),
            date_column,
            dates,
        }
    }

    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    pub fn dates(&self) -> &[Option<NaiveDate>] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows whose date could not be parsed
    pub fn unparsed_count(&self) -> usize {
        self.dates.iter().filter(|d| d.is_none()).count()
    }

    /// Iterate over (row, normalized date) pairs in row order
    pub fn iter(&self) -> impl Iterator<Item = (&Row, Option<NaiveDate>)> {
        self.rows.iter().zip(self.dates.iter().copied())
    }

    /// Drop the normalized column, keeping only the visible rows
    pub fn into_rows(self) -> RowSet {
        self.rows
    }
}
