use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DegradationEvent, PipelineState};

/// Counters for one run. Built once, returned and logged, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Candidates produced by the generation stage.
    pub generated_count: usize,
    /// Candidates dropped because their text was already known.
    pub duplicate_count: usize,
    /// Records the store accepted.
    pub inserted_count: usize,
    /// False only when an append was attempted and failed.
    pub insertion_succeeded: bool,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self {
            generated_count: 0,
            duplicate_count: 0,
            inserted_count: 0,
            insertion_succeeded: true,
        }
    }
}

/// Everything observable about a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub final_state: PipelineState,
    pub state_history: Vec<PipelineState>,
    pub summary: RunSummary,
    pub degradations: Vec<DegradationEvent>,
}

impl RunReport {
    /// Reached `Done` with every attempted write accepted.
    pub fn is_clean_success(&self) -> bool {
        self.final_state == PipelineState::Done && self.summary.insertion_succeeded
    }
}
