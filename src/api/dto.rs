//! Data Transfer Objects
//!
//! Query parameters shared by the page and the JSON endpoints, and the
//! response bodies of the JSON endpoints.

use crate::filter::Summary;
use crate::store::Value;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accepted formats for date bounds typed by a user, in priority order
const BOUND_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

// ============================================
// REQUEST DTOs
// ============================================

/// Query parameters for viewing, exporting and listing
///
/// Every field is optional. `db_path` and `table` override the session
/// configuration for this request only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewParams {
    #[serde(default)]
    pub db_path: Option<String>,
    #[serde(default)]
    pub table: Option<String>,
    /// Inclusive lower bound (`YYYY-MM-DD` or `DD/MM/YYYY`, empty = unbounded)
    #[serde(default)]
    pub from: Option<String>,
    /// Inclusive upper bound (`YYYY-MM-DD` or `DD/MM/YYYY`, empty = unbounded)
    #[serde(default)]
    pub to: Option<String>,
    /// Value for the first configured field column
    #[serde(default)]
    pub field1: Option<String>,
    /// Value for the second configured field column
    #[serde(default)]
    pub field2: Option<String>,
}

impl ViewParams {
    /// Parse both bounds; absent and empty both mean unbounded
    pub fn bounds(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), String> {
        Ok((parse_bound(self.from.as_deref())?, parse_bound(self.to.as_deref())?))
    }

    /// Field input values in form order
    pub fn field_values(&self) -> Vec<Option<String>> {
        vec![self.field1.clone(), self.field2.clone()]
    }

    /// Encode the parameters as a query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        [
            ("db_path", &self.db_path),
            ("table", &self.table),
            ("from", &self.from),
            ("to", &self.to),
            ("field1", &self.field1),
            ("field2", &self.field2),
        ]
        .into_iter()
        .filter_map(|(k, v)| {
            v.as_ref()
                .map(|v| format!("{}={}", k, urlencoding::encode(v)))
        })
        .collect::<Vec<_>>()
        .join("&")
    }
}

/// Parse one user-supplied date bound
pub fn parse_bound(input: Option<&str>) -> Result<Option<NaiveDate>, String> {
    let text = match input.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(t) => t,
    };

    BOUND_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(Some)
        .ok_or_else(|| format!("Invalid date '{}': expected YYYY-MM-DD or DD/MM/YYYY", text))
}

// ============================================
// RESPONSE DTOs
// ============================================

/// Filtered rows response
#[derive(Debug, Serialize)]
pub struct RowsResponse {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Rows in the table before filtering
    pub source_rows: usize,
    /// Source rows excluded for unparseable dates
    pub unparsed_rows: usize,
    pub summary: Summary,
}

/// Table listing response
#[derive(Debug, Serialize)]
pub struct TablesResponse {
    pub tables: Vec<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// healthy, unconfigured or unavailable
    pub status: String,
    /// ok, missing or error
    pub database: String,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bound() {
        let feb1 = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        assert_eq!(parse_bound(None), Ok(None));
        assert_eq!(parse_bound(Some("")), Ok(None));
        assert_eq!(parse_bound(Some("  ")), Ok(None));
        assert_eq!(parse_bound(Some("2023-02-01")), Ok(Some(feb1)));
        assert_eq!(parse_bound(Some("01/02/2023")), Ok(Some(feb1)));
        assert!(parse_bound(Some("yesterday")).is_err());
    }

    #[test]
    fn test_query_string() {
        let params = ViewParams {
            db_path: Some("/data/EFRIS PDF Report.db".into()),
            from: Some("2023-02-01".into()),
            to: Some(String::new()),
            field1: Some("A&B".into()),
            ..Default::default()
        };
        assert_eq!(
            params.to_query_string(),
            "db_path=%2Fdata%2FEFRIS%20PDF%20Report.db&from=2023-02-01&to=&field1=A%26B"
        );
    }
}
