//! Read-Only Store Access
//!
//! Loads tables from a local SQLite database without ever writing to it:
//!
//! - **types**: In-memory row set (`RowSet`) and cell values (`Value`)
//! - **reader**: Read-only connection wrapper and table loader
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use report_viewer::store::load_table;
//! use std::path::Path;
//!
//! let rows = load_table(Path::new("/data/reports.db"), "EfrisPdfReport")?;
//! println!("Loaded {} rows with columns {:?}", rows.len(), rows.columns());
//! # Ok::<(), report_viewer::store::StoreError>(())
//! ```

pub mod error;
pub mod reader;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use reader::{load_table, TableReader};
pub use types::{Row, RowSet, Value};
