//! Viewer error types
//!
//! The taxonomy surfaced to users. Lower layers keep their own error enums;
//! these conversions decide which bucket each one lands in.

use crate::export::ExportError;
use crate::filter::FilterError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by the load-and-filter pipeline
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Required setting missing or pointing at something unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database file missing or not a database
    #[error("{0}")]
    NotFound(String),

    /// Table or column absent
    #[error("Schema error: {0}")]
    Schema(String),

    /// CSV serialization failed
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Unexpected failure reading the store
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ViewerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ViewerError::NotFound(err.to_string()),
            StoreError::TableNotFound { .. } => ViewerError::Schema(err.to_string()),
            StoreError::Sqlite(_) => ViewerError::Internal(err.to_string()),
        }
    }
}

impl From<FilterError> for ViewerError {
    fn from(err: FilterError) -> Self {
        ViewerError::Configuration(err.to_string())
    }
}

impl ViewerError {
    /// Short machine-readable kind, used in API responses and logs
    pub fn code(&self) -> &'static str {
        match self {
            ViewerError::Configuration(_) => "CONFIGURATION_ERROR",
            ViewerError::NotFound(_) => "NOT_FOUND",
            ViewerError::Schema(_) => "SCHEMA_ERROR",
            ViewerError::Export(_) => "EXPORT_ERROR",
            ViewerError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type for pipeline operations
pub type ViewerResult<T> = Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_store_error_mapping() {
        let err: ViewerError = StoreError::NotFound {
            path: PathBuf::from("/x.db"),
            reason: None,
        }
        .into();
        assert!(matches!(err, ViewerError::NotFound(_)));
        assert_eq!(err.to_string(), "Database not found at: /x.db");

        let err: ViewerError = StoreError::TableNotFound {
            table: "T".into(),
            available: vec![],
        }
        .into();
        assert_eq!(err.code(), "SCHEMA_ERROR");
        assert!(err.to_string().contains("Table 'T' not found"));
    }

    #[test]
    fn test_filter_error_is_configuration() {
        let err: ViewerError = FilterError::UnknownColumn("TIN".into()).into();
        assert!(matches!(err, ViewerError::Configuration(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: Filter column 'TIN' not found"
        );
    }
}
