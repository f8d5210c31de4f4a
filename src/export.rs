//! CSV Export
//!
//! Serializes a row set with a header of its original column names. Only
//! visible columns exist on a `RowSet`, so derived data never leaks into
//! the file.

use crate::store::RowSet;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur while exporting
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Write rows as CSV to any writer
pub fn write_csv<W: Write>(rows: &RowSet, writer: W) -> ExportResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(rows.columns())?;
    for row in rows {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render rows as CSV bytes
pub fn to_csv_bytes(rows: &RowSet) -> ExportResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}
