//! Table Reader - read-only SQLite access
//!
//! Opens the database with `SQLITE_OPEN_READ_ONLY` and additionally turns on
//! `PRAGMA query_only`, so no statement issued through a reader can modify
//! the file. The connection lives as long as the reader and is closed on drop.

use crate::store::{Row, RowSet, StoreError, StoreResult, Value};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Read-only handle to one SQLite database file
pub struct TableReader {
    conn: Connection,
    path: PathBuf,
}

impl TableReader {
    /// Open a database for reading
    ///
    /// Fails with `NotFound` if the path is not a regular file or SQLite
    /// does not recognise it as a database.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if !path.is_file() {
            return Err(StoreError::NotFound {
                path: path.to_path_buf(),
                reason: None,
            });
        }

        let not_found = |e: rusqlite::Error| StoreError::NotFound {
            path: path.to_path_buf(),
            reason: Some(e.to_string()),
        };

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(not_found)?;

        conn.pragma_update(None, "query_only", true)
            .map_err(not_found)?;

        // SQLite opens lazily; touch the schema so a non-database file fails here
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(not_found)?;

        tracing::debug!(path = %path.display(), "Opened database read-only");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Path this reader was opened on
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all user tables and views, sorted
    pub fn table_names(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names)
    }

    /// Check whether a table or view exists
    ///
    /// Case-insensitive, as SQLite resolves identifiers.
    pub fn has_table(&self, table: &str) -> StoreResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT count(*) FROM sqlite_master
             WHERE type IN ('table', 'view') AND name = ?1 COLLATE NOCASE",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Load every row and column of a table in SQLite's default order
    pub fn load_table(&self, table: &str) -> StoreResult<RowSet> {
        if !self.has_table(table)? {
            return Err(StoreError::TableNotFound {
                table: table.to_string(),
                available: self.table_names()?,
            });
        }

        let sql = format!("SELECT * FROM {}", quote_identifier(table));
        let mut stmt = self.conn.prepare(&sql)?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let mut rows: Vec<Row> = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(convert_value(row.get_ref(i)?));
            }
            rows.push(values);
        }

        tracing::info!(
            table = %table,
            rows = rows.len(),
            columns = width,
            "Loaded table"
        );

        Ok(RowSet::new(columns, rows))
    }
}

/// Open `path`, load `table`, and release the connection
pub fn load_table(path: &Path, table: &str) -> StoreResult<RowSet> {
    let reader = TableReader::open(path)?;
    reader.load_table(table)
}

/// Quote an identifier for use in SQL text
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn convert_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}
