//! Store error types
//!
//! Defines all errors that can occur while reading from the database.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the read-only store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Path does not resolve to a readable SQLite database
    #[error("Database not found at: {}{}", path.display(), reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default())]
    NotFound {
        path: PathBuf,
        reason: Option<String>,
    },

    /// Requested table does not exist
    #[error("Table '{table}' not found. {}", available_hint(available))]
    TableNotFound {
        table: String,
        available: Vec<String>,
    },

    /// SQLite reported an error while reading
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

fn available_hint(available: &[String]) -> String {
    if available.is_empty() {
        "No tables found.".to_string()
    } else {
        format!("Available tables: {}", available.join(", "))
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
