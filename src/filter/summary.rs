//! Result summary: row count, amount total and date span

use crate::filter::DatedRows;
use crate::store::Value;
use chrono::NaiveDate;
use serde::Serialize;

/// Headline numbers shown above a result table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub row_count: usize,
    /// Sum of numeric amounts, `None` when no row had one
    pub amount_total: Option<f64>,
    /// Earliest and latest normalized date in the result
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

/// Summarize a (typically filtered) dated row set
pub fn summarize(rows: &DatedRows, amount_column: Option<&str>) -> Summary {
    let amount_total = amount_column
        .and_then(|col| rows.rows().column_values(col))
        .and_then(|values| {
            values
                .filter_map(coerce_amount)
                .fold(None, |acc: Option<f64>, v| Some(acc.unwrap_or(0.0) + v))
        });

    let mut dates = rows.dates().iter().flatten().copied();
    let date_span = dates.next().map(|first| {
        dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)))
    });

    Summary {
        row_count: rows.len(),
        amount_total,
        date_span,
    }
}

/// Interpret a cell as a number
///
/// Text like `"1,250.00"` is accepted after stripping thousands separators
/// and whitespace. Anything else is skipped.
pub fn coerce_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Real(r) if r.is_finite() => Some(*r),
        Value::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}
