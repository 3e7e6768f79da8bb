use serde::{Deserialize, Serialize};

/// Stages of one keyword run.
///
/// `Init → FetchingCorpus → Generating → Filtering → Persisting → Done`,
/// with `Aborted` reachable from any stage on a fatal setup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Init,
    FetchingCorpus,
    Generating,
    Filtering,
    Persisting,
    Done,
    Aborted,
}

impl PipelineState {
    /// Whether the run has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        use PipelineState::*;
        match (self, next) {
            (Done | Aborted, _) => false,
            (_, Aborted) => true,
            (Init, FetchingCorpus) => true,
            // Duplicate checking off skips the corpus read.
            (Init, Generating) => true,
            (FetchingCorpus, Generating) => true,
            (Generating, Filtering | Done) => true,
            (Filtering, Persisting | Done) => true,
            (Persisting, Done) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::FetchingCorpus => "fetching_corpus",
            Self::Generating => "generating",
            Self::Filtering => "filtering",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}
