//! Load-and-Filter Pipeline
//!
//! One synchronous pass per user action:
//!
//! ```text
//!   SourceConfig → load_table → DateNormalizer::attach → filter_rows → summarize
//! ```
//!
//! The HTTP handlers and the CLI both call [`load_and_filter`]; nothing here
//! depends on either.

use crate::config::{Config, SourceConfig};
use crate::error::{ViewerError, ViewerResult};
use crate::filter::{filter_rows, summarize, DatedRows, FilterCriteria, Summary};
use crate::store::{load_table, RowSet, TableReader};
use std::path::Path;

/// Everything a view needs after one pipeline run
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Retained rows with their normalized dates
    pub result: DatedRows,
    /// Row count of the table before filtering
    pub source_rows: usize,
    /// Source rows excluded because their date could not be parsed
    pub unparsed_rows: usize,
    pub summary: Summary,
}

impl FilterOutcome {
    /// Visible rows only, ready to render or export
    pub fn rows(&self) -> &RowSet {
        self.result.rows()
    }

    pub fn into_rows(self) -> RowSet {
        self.result.into_rows()
    }
}

/// Check that a database path and table name are present
pub fn require_source(source: &SourceConfig) -> ViewerResult<(&Path, &str)> {
    let path = source
        .db_path
        .as_deref()
        .ok_or_else(|| ViewerError::Configuration("Enter a database path to continue.".into()))?;

    if source.table_name.trim().is_empty() {
        return Err(ViewerError::Configuration(
            "Enter a table name to continue.".into(),
        ));
    }

    Ok((path, source.table_name.as_str()))
}

/// Load the configured table, normalize its dates, and apply `criteria`
pub fn load_and_filter(config: &Config, criteria: &FilterCriteria) -> ViewerResult<FilterOutcome> {
    let (path, table) = require_source(&config.source)?;

    let rows = load_table(path, table)?;
    let source_rows = rows.len();

    let dated = config
        .filter
        .normalizer()
        .attach(rows, &config.filter.date_column)?;
    let unparsed_rows = dated.unparsed_count();

    let result = filter_rows(&dated, criteria)?;
    let summary = summarize(&result, config.filter.amount_column.as_deref());

    tracing::info!(
        table = %table,
        source_rows,
        unparsed_rows,
        kept = result.len(),
        "Applied filter"
    );

    Ok(FilterOutcome {
        result,
        source_rows,
        unparsed_rows,
        summary,
    })
}

/// List tables in the configured database
pub fn list_tables(source: &SourceConfig) -> ViewerResult<Vec<String>> {
    let path = source
        .db_path
        .as_deref()
        .ok_or_else(|| ViewerError::Configuration("Enter a database path to continue.".into()))?;

    let reader = TableReader::open(path)?;
    Ok(reader.table_names()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FieldMatch, MatchMode};
    use crate::store::Value;
    use chrono::NaiveDate;
    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixture() -> (TempDir, Config) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("EFRIS PDF Report.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE "EfrisPdfReport" (
                "Activity Date" TEXT,
                "TIN" TEXT,
                "Assessment Number" TEXT,
                "Amount Assessed" TEXT
            );
            INSERT INTO "EfrisPdfReport" VALUES ('01/02/2023', 'A', 'AN-1', '1,000.00');
            INSERT INTO "EfrisPdfReport" VALUES ('15/02/2023', 'B', 'AN-2', '250');
            INSERT INTO "EfrisPdfReport" VALUES ('garbage', 'C', 'AN-3', '99');
            INSERT INTO "EfrisPdfReport" VALUES ('2023-02-05', 'B', 'AN-4', NULL);
            "#,
        )
        .unwrap();
        drop(conn);

        let mut config = Config::default();
        config.source.db_path = Some(path);
        (dir, config)
    }

    fn tins(outcome: &FilterOutcome) -> Vec<String> {
        outcome
            .rows()
            .column_values("TIN")
            .unwrap()
            .map(|v| v.to_string())
            .collect()
    }

    #[test]
    fn test_bounded_filter() {
        let (_dir, config) = fixture();
        let criteria = FilterCriteria::new()
            .from_date(ymd(2023, 2, 1))
            .to_date(ymd(2023, 2, 10));

        let outcome = load_and_filter(&config, &criteria).unwrap();

        assert_eq!(tins(&outcome), vec!["A", "B"]);
        assert_eq!(outcome.source_rows, 4);
        assert_eq!(outcome.unparsed_rows, 1);
        assert_eq!(outcome.summary.row_count, 2);
        assert_eq!(outcome.summary.amount_total, Some(1000.0));
        assert_eq!(
            outcome.summary.date_span,
            Some((ymd(2023, 2, 1), ymd(2023, 2, 5)))
        );
    }

    #[test]
    fn test_field_filter_through_config() {
        let (_dir, config) = fixture();
        let criteria = config
            .filter
            .criteria(None, None, &[Some("B".into()), None]);

        let outcome = load_and_filter(&config, &criteria).unwrap();
        assert_eq!(tins(&outcome), vec!["B", "B"]);
        assert_eq!(
            outcome.rows().get(1, "Assessment Number"),
            Some(&Value::from("AN-4"))
        );
    }

    #[test]
    fn test_contains_mode() {
        let (_dir, config) = fixture();
        let criteria = FilterCriteria::new().with_field(FieldMatch::new(
            "Assessment Number",
            Some("an-".into()),
            MatchMode::Contains,
        ));

        let outcome = load_and_filter(&config, &criteria).unwrap();
        assert_eq!(outcome.rows().len(), 3);
    }

    #[test]
    fn test_missing_path_is_configuration_error() {
        let config = Config::default();
        let err = load_and_filter(&config, &FilterCriteria::new()).unwrap_err();
        assert!(matches!(err, ViewerError::Configuration(_)));
    }

    #[test]
    fn test_empty_table_name_is_configuration_error() {
        let (_dir, mut config) = fixture();
        config.source.table_name = " ".into();
        let err = load_and_filter(&config, &FilterCriteria::new()).unwrap_err();
        assert!(matches!(err, ViewerError::Configuration(_)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let mut config = Config::default();
        config.source.db_path = Some(PathBuf::from("/definitely/not/here.db"));
        let err = load_and_filter(&config, &FilterCriteria::new()).unwrap_err();
        assert!(matches!(err, ViewerError::NotFound(_)));
    }

    #[test]
    fn test_missing_table_is_schema_error() {
        let (_dir, mut config) = fixture();
        config.source.table_name = "Nope".into();
        let err = load_and_filter(&config, &FilterCriteria::new()).unwrap_err();
        assert!(matches!(err, ViewerError::Schema(_)));
        assert!(err.to_string().contains("EfrisPdfReport"));
    }

    #[test]
    fn test_missing_date_column_is_configuration_error() {
        let (_dir, mut config) = fixture();
        config.filter.date_column = "Posting Date".into();
        let err = load_and_filter(&config, &FilterCriteria::new()).unwrap_err();
        assert!(matches!(err, ViewerError::Configuration(_)));
        assert!(err.to_string().contains("Posting Date"));
    }

    #[test]
    fn test_missing_field_column_is_configuration_error() {
        let (_dir, config) = fixture();
        let criteria = FilterCriteria::new().field("Region", "North");
        let err = load_and_filter(&config, &criteria).unwrap_err();
        assert!(matches!(err, ViewerError::Configuration(_)));
    }

    #[test]
    fn test_store_not_modified() {
        let (_dir, config) = fixture();
        let path = config.source.db_path.clone().unwrap();
        let before = std::fs::read(&path).unwrap();

        load_and_filter(&config, &FilterCriteria::new()).unwrap();
        load_and_filter(&config, &FilterCriteria::new().field("TIN", "A")).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_list_tables() {
        let (_dir, config) = fixture();
        assert_eq!(list_tables(&config.source).unwrap(), vec!["EfrisPdfReport"]);
        assert!(list_tables(&SourceConfig::default()).is_err());
    }
}
