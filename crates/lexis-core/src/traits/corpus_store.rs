use std::collections::HashSet;

use crate::config::{ColumnSet, StoreConfig};
use crate::errors::LexisResult;
use crate::models::{AppendOutcome, KeywordRecord};

/// Append-only keyword store.
///
/// Implementations report failures as errors; the degradation policy
/// (empty corpus on read failure, `ok = false` on write failure) lives in
/// the gateway that wraps them.
pub trait ICorpusStore: Send + Sync {
    /// Distinct, non-null values of `column` across `table`.
    fn read_existing(&self, column: &str, table: &str) -> LexisResult<HashSet<String>>;

    /// Append one row per record. Only the columns in `columns` are written.
    fn append(
        &self,
        rows: &[KeywordRecord],
        columns: &ColumnSet,
        table: &str,
    ) -> LexisResult<AppendOutcome>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}

/// Initializes a store client for one run.
pub trait IStoreConnector: Send + Sync {
    fn connect(&self, config: &StoreConfig) -> LexisResult<Box<dyn ICorpusStore>>;
}
