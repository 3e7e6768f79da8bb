mod append_outcome;
mod degradation_event;
mod keyword_record;
mod pipeline_state;
mod run_report;

pub use append_outcome::AppendOutcome;
pub use degradation_event::DegradationEvent;
pub use keyword_record::KeywordRecord;
pub use pipeline_state::PipelineState;
pub use run_report::{RunReport, RunSummary};
