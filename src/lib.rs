//! # Report Viewer
//!
//! Read-only viewer for one table of a local SQLite report database: filter
//! by a date range and up to two field values, review a summary, and export
//! the visible rows as CSV.
//!
//! ## Modules
//!
//! - [`store`]: Read-only SQLite access and the in-memory row set
//! - [`filter`]: Date normalization, filter engine and summary metrics
//! - [`export`]: CSV serialization
//! - [`pipeline`]: Load, normalize, filter and summarize in one call
//! - [`config`]: File, environment and command-line configuration
//! - [`api`]: Web page and JSON API with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use report_viewer::config::Config;
//! use report_viewer::export::write_csv;
//! use report_viewer::pipeline::load_and_filter;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.source.db_path = Some("EFRIS PDF Report.db".into());
//!
//!     let criteria = config.filter.criteria(None, None, &[Some("1000012345".into())]);
//!     let outcome = load_and_filter(&config, &criteria)?;
//!
//!     println!("{} of {} rows kept", outcome.summary.row_count, outcome.source_rows);
//!     write_csv(outcome.rows(), std::io::stdout())?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod pipeline;
pub mod store;

// Re-export top-level types for convenience
pub use store::{load_table, RowSet, StoreError, TableReader, Value};

pub use filter::{filter_rows, DateNormalizer, DatedRows, FieldMatch, FilterCriteria, Summary};

pub use config::{Config, ConfigOverrides};

pub use error::{ViewerError, ViewerResult};

pub use pipeline::{load_and_filter, FilterOutcome};

pub use api::{build_router, serve, ApiError, AppState};
