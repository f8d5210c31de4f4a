//! Date-Aware Row Filtering
//!
//! Turns a loaded `RowSet` into the subset a user asked for:
//!
//! - **normalize**: Parse heterogeneous date text into `NaiveDate`
//! - **criteria**: Filter criteria value objects (date bounds + field matches)
//! - **engine**: Apply criteria, preserving row order
//! - **summary**: Row count, amount total and date span of a result
//! - **error**: Error types
//!
//! # Pipeline
//!
//! ```text
//!   RowSet → DateNormalizer::attach → DatedRows → filter_rows → DatedRows → into_rows → RowSet
//! ```
//!
//! Rows whose date text cannot be parsed never survive `filter_rows`, even
//! when no date bound is set.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use report_viewer::filter::{filter_rows, DateNormalizer, FilterCriteria};
//! use report_viewer::store::{RowSet, Value};
//!
//! let rows = RowSet::new(
//!     vec!["date".into(), "tin".into()],
//!     vec![
//!         vec![Value::from("01/02/2023"), Value::from("A")],
//!         vec![Value::from("15/02/2023"), Value::from("B")],
//!         vec![Value::from("garbage"), Value::from("C")],
//!     ],
//! );
//!
//! let dated = DateNormalizer::default().attach(rows, "date")?;
//! let criteria = FilterCriteria::new()
//!     .from_date(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap())
//!     .to_date(NaiveDate::from_ymd_opt(2023, 2, 10).unwrap());
//!
//! let result = filter_rows(&dated, &criteria)?;
//! assert_eq!(result.len(), 1);
//! # Ok::<(), report_viewer::filter::FilterError>(())
//! ```

mod criteria;
mod engine;
mod error;
mod normalize;
mod summary;

pub use criteria::{FieldMatch, FilterCriteria, MatchMode};
pub use engine::filter_rows;
pub use error::{FilterError, FilterResult};
pub use normalize::{DateNormalizer, DatedRows, DEFAULT_DATE_FORMATS};
pub use summary::{coerce_amount, summarize, Summary};
