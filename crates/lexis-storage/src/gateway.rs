//! CorpusGateway: the run's view of the keyword store.
//!
//! Read failures degrade to an empty corpus and write failures to
//! `ok = false`; neither propagates. Every degradation is logged and kept as
//! a `DegradationEvent` for the run report.

use std::collections::HashSet;

use lexis_core::config::ColumnSet;
use lexis_core::models::{AppendOutcome, DegradationEvent, KeywordRecord};
use lexis_core::traits::ICorpusStore;
use tracing::{info, warn};

const COMPONENT: &str = "corpus";

/// Degrading wrapper over an [`ICorpusStore`].
pub struct CorpusGateway {
    store: Box<dyn ICorpusStore>,
    events: Vec<DegradationEvent>,
}

impl CorpusGateway {
    pub fn new(store: Box<dyn ICorpusStore>) -> Self {
        Self {
            store,
            events: Vec::new(),
        }
    }

    /// Distinct non-null values of `column` in `table`.
    ///
    /// Returns an empty set when the store cannot be read.
    pub fn read_existing(&mut self, column: &str, table: &str) -> HashSet<String> {
        info!(backend = self.store.name(), table, column, "fetching existing keywords");
        match self.store.read_existing(column, table) {
            Ok(existing) => {
                info!(existing = existing.len(), "existing keywords loaded");
                existing
            }
            Err(e) => {
                warn!(
                    backend = self.store.name(),
                    error = %e,
                    "corpus read failed, continuing with an empty corpus"
                );
                self.events.push(DegradationEvent::now(
                    COMPONENT,
                    format!("read failed: {e}"),
                    "empty corpus",
                ));
                HashSet::new()
            }
        }
    }

    /// Append one row per record.
    ///
    /// An empty batch is a no-op that reports success. A failed batch is
    /// reported with the provider's detail; nothing is retried or rolled back.
    pub fn append(
        &mut self,
        rows: &[KeywordRecord],
        columns: &ColumnSet,
        table: &str,
    ) -> AppendOutcome {
        if rows.is_empty() {
            info!("no keywords to insert");
            return AppendOutcome::success(0);
        }

        info!(
            backend = self.store.name(),
            table,
            rows = rows.len(),
            "inserting new keywords"
        );
        let outcome = match self.store.append(rows, columns, table) {
            Ok(outcome) => outcome,
            Err(e) => AppendOutcome::failure(vec![e.to_string()]),
        };

        if outcome.ok {
            info!(inserted = outcome.rows_written, "keywords inserted");
        } else {
            warn!(
                backend = self.store.name(),
                errors = ?outcome.partial_errors,
                "keyword insert failed"
            );
            self.events.push(DegradationEvent::now(
                COMPONENT,
                format!("append failed: {}", outcome.partial_errors.join("; ")),
                "keywords not persisted",
            ));
        }
        outcome
    }

    /// Drain accumulated degradation events.
    pub fn drain_events(&mut self) -> Vec<DegradationEvent> {
        std::mem::take(&mut self.events)
    }
}
