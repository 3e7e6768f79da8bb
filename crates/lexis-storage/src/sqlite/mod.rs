//! SQLite corpus store.
//!
//! One connection behind a mutex. The keyword table is created on connect
//! and missing optional columns are added, so a configured category or
//! description column is always writable.

mod pragmas;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use lexis_core::config::ColumnSet;
use lexis_core::errors::{LexisResult, StorageError};
use lexis_core::models::{AppendOutcome, KeywordRecord};
use lexis_core::traits::ICorpusStore;
use rusqlite::Connection;
use tracing::debug;

use crate::identifiers::quote_sqlite;
use crate::to_storage_err;

pub struct SqliteCorpusStore {
    conn: Mutex<Connection>,
}

impl SqliteCorpusStore {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> LexisResult<Self> {
        let conn = Connection::open(path).map_err(|e| StorageError::ConnectFailed {
            backend: "sqlite".to_string(),
            reason: format!("{}: {e}", path.display()),
        })?;
        pragmas::apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> LexisResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::ConnectFailed {
            backend: "sqlite".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create `table` if needed and add any missing configured columns.
    pub fn ensure_table(&self, table: &str, columns: &ColumnSet) -> LexisResult<()> {
        self.with_conn(|conn| {
            let quoted_table = quote_sqlite(table)?;
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {quoted_table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    {} TEXT
                );",
                quote_sqlite(&columns.keyword)?
            ))
            .map_err(|e| to_storage_err(e.to_string()))?;

            let present = table_columns(conn, table)?;
            for name in columns.names() {
                if !present.contains(name) {
                    debug!(table, column = name, "adding missing column");
                    conn.execute_batch(&format!(
                        "ALTER TABLE {quoted_table} ADD COLUMN {} TEXT;",
                        quote_sqlite(name)?
                    ))
                    .map_err(|e| to_storage_err(e.to_string()))?;
                }
            }
            Ok(())
        })
    }

    fn with_conn<F, T>(&self, f: F) -> LexisResult<T>
    where
        F: FnOnce(&mut Connection) -> LexisResult<T>,
    {
        let mut guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("connection lock poisoned: {e}")))?;
        f(&mut guard)
    }
}

fn table_columns(conn: &Connection, table: &str) -> LexisResult<HashSet<String>> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info(?1)")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?
        .collect::<Result<HashSet<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(names)
}

impl ICorpusStore for SqliteCorpusStore {
    fn read_existing(&self, column: &str, table: &str) -> LexisResult<HashSet<String>> {
        let read_err = |e: rusqlite::Error| StorageError::ReadFailed {
            table: table.to_string(),
            reason: e.to_string(),
        };
        self.with_conn(|conn| {
            let col = quote_sqlite(column)?;
            let sql = format!(
                "SELECT DISTINCT {col} FROM {} WHERE {col} IS NOT NULL",
                quote_sqlite(table)?
            );
            let mut stmt = conn.prepare(&sql).map_err(read_err)?;
            let values = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(read_err)?
                .collect::<Result<HashSet<_>, _>>()
                .map_err(read_err)?;
            Ok(values)
        })
    }

    fn append(
        &self,
        rows: &[KeywordRecord],
        columns: &ColumnSet,
        table: &str,
    ) -> LexisResult<AppendOutcome> {
        let write_err = |e: rusqlite::Error| StorageError::WriteFailed {
            table: table.to_string(),
            reason: e.to_string(),
        };
        self.with_conn(|conn| {
            let names = columns
                .names()
                .into_iter()
                .map(quote_sqlite)
                .collect::<LexisResult<Vec<_>>>()?;
            let placeholders = vec!["?"; names.len()].join(", ");
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({placeholders})",
                quote_sqlite(table)?,
                names.join(", ")
            );

            let tx = conn.transaction().map_err(write_err)?;
            {
                let mut stmt = tx.prepare(&sql).map_err(write_err)?;
                for record in rows {
                    let mut values: Vec<&str> = vec![record.text()];
                    if columns.category.is_some() {
                        values.push(record.category());
                    }
                    if columns.description.is_some() {
                        values.push(record.description());
                    }
                    stmt.execute(rusqlite::params_from_iter(values))
                        .map_err(write_err)?;
                }
            }
            tx.commit().map_err(write_err)?;
            Ok(AppendOutcome::success(rows.len()))
        })
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
