use serde::{Deserialize, Serialize};

/// Result of appending a batch to the corpus store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendOutcome {
    /// Whether the whole batch was accepted.
    pub ok: bool,
    /// Rows written by the store.
    pub rows_written: usize,
    /// Provider error details, one entry per failed row or request.
    pub partial_errors: Vec<String>,
}

impl AppendOutcome {
    /// Every row was written.
    pub fn success(rows_written: usize) -> Self {
        Self {
            ok: true,
            rows_written,
            partial_errors: Vec::new(),
        }
    }

    /// The batch failed; `errors` carries the provider detail.
    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            ok: false,
            rows_written: 0,
            partial_errors: errors,
        }
    }
}
