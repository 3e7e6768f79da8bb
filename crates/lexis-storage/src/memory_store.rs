//! Process-local corpus store.
//!
//! Rows are kept per table as column → value maps. Clones share the same
//! tables, so one instance can back many runs.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use lexis_core::config::ColumnSet;
use lexis_core::errors::{LexisResult, StorageError};
use lexis_core::models::{AppendOutcome, KeywordRecord};
use lexis_core::traits::ICorpusStore;

use crate::identifiers::ensure_valid;

type Row = HashMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpusStore {
    tables: Arc<RwLock<HashMap<String, Vec<Row>>>>,
}

impl InMemoryCorpusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `table` with keyword texts in `column`.
    pub fn seed<I, S>(&self, table: &str, column: &str, keywords: I) -> LexisResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tables = self.write_lock(table)?;
        let rows = tables.entry(table.to_string()).or_default();
        rows.extend(
            keywords
                .into_iter()
                .map(|k| Row::from([(column.to_string(), k.into())])),
        );
        Ok(())
    }

    /// Number of rows in `table`, duplicates included.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|tables| tables.get(table).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Value of `column` in every row of `table`, in insertion order.
    pub fn column_values(&self, table: &str, column: &str) -> Vec<Option<String>> {
        self.tables
            .read()
            .map(|tables| {
                tables
                    .get(table)
                    .map(|rows| rows.iter().map(|r| r.get(column).cloned()).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    fn write_lock(
        &self,
        table: &str,
    ) -> LexisResult<std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<Row>>>> {
        self.tables.write().map_err(|e| {
            StorageError::WriteFailed {
                table: table.to_string(),
                reason: format!("lock poisoned: {e}"),
            }
            .into()
        })
    }
}

impl ICorpusStore for InMemoryCorpusStore {
    fn read_existing(&self, column: &str, table: &str) -> LexisResult<HashSet<String>> {
        ensure_valid(column)?;
        ensure_valid(table)?;
        let tables = self.tables.read().map_err(|e| StorageError::ReadFailed {
            table: table.to_string(),
            reason: format!("lock poisoned: {e}"),
        })?;
        Ok(tables
            .get(table)
            .map(|rows| rows.iter().filter_map(|r| r.get(column).cloned()).collect())
            .unwrap_or_default())
    }

    fn append(
        &self,
        rows: &[KeywordRecord],
        columns: &ColumnSet,
        table: &str,
    ) -> LexisResult<AppendOutcome> {
        ensure_valid(table)?;
        for name in columns.names() {
            ensure_valid(name)?;
        }
        let mut tables = self.write_lock(table)?;
        let stored = tables.entry(table.to_string()).or_default();
        for record in rows {
            let mut row = Row::new();
            row.insert(columns.keyword.clone(), record.text().to_string());
            if let Some(col) = &columns.category {
                row.insert(col.clone(), record.category().to_string());
            }
            if let Some(col) = &columns.description {
                row.insert(col.clone(), record.description().to_string());
            }
            stored.push(row);
        }
        Ok(AppendOutcome::success(rows.len()))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
