//! Filter error types

use thiserror::Error;

/// Errors that can occur while preparing or applying a filter
///
/// Every variant is a configuration problem: the data itself never makes
/// filtering fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The configured date column is not in the table
    #[error("Date column '{0}' not found")]
    UnknownDateColumn(String),

    /// A secondary filter names a column that is not in the table
    #[error("Filter column '{0}' not found")]
    UnknownColumn(String),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
