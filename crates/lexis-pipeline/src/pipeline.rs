//! DedupPipeline: the run state machine.
//!
//! `Init → FetchingCorpus → Generating → Filtering → Persisting → Done`.
//! Only setup failures in `Init` abort a run. Every later failure degrades
//! to fewer or zero results and is recorded on the report.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lexis_core::errors::LexisResult;
use lexis_core::models::{DegradationEvent, PipelineState, RunReport, RunSummary};
use lexis_core::traits::{IGeneratorFactory, ISecretStore, IStoreConnector};
use lexis_core::{LexisConfig, LexisError};
use lexis_generation::{GenerationRequest, KeywordGenerator};
use lexis_storage::CorpusGateway;
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::credentials::resolve_api_key;
use crate::filter::filter_new;

/// External collaborators a run is wired to.
#[derive(Clone)]
pub struct RunEnvironment {
    pub secrets: Arc<dyn ISecretStore>,
    pub connector: Arc<dyn IStoreConnector>,
    pub generators: Arc<dyn IGeneratorFactory>,
}

/// A run that stopped in `Aborted`.
#[derive(Debug, thiserror::Error)]
#[error("run {} aborted: {error}", .report.run_id)]
pub struct AbortedRun {
    pub report: RunReport,
    #[source]
    pub error: LexisError,
}

/// Mutable bookkeeping for one run. Never shared between runs.
struct RunTracker {
    run_id: String,
    started_at: DateTime<Utc>,
    state: PipelineState,
    history: Vec<PipelineState>,
    summary: RunSummary,
    degradations: Vec<DegradationEvent>,
}

impl RunTracker {
    fn new(run_id: String) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            state: PipelineState::Init,
            history: vec![PipelineState::Init],
            summary: RunSummary::default(),
            degradations: Vec::new(),
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        info!(from = %self.state, to = %next, "state transition");
        self.state = next;
        self.history.push(next);
    }

    fn finish(self) -> RunReport {
        RunReport {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            final_state: self.state,
            state_history: self.history,
            summary: self.summary,
            degradations: self.degradations,
        }
    }
}

/// Runs one generation-dedup-append pass per call.
pub struct DedupPipeline {
    config: LexisConfig,
    env: RunEnvironment,
}

impl DedupPipeline {
    pub fn new(config: LexisConfig, env: RunEnvironment) -> Self {
        Self { config, env }
    }

    /// Execute one run.
    ///
    /// Returns the report on `Done`, including degraded completions. A setup
    /// failure returns [`AbortedRun`] carrying the error and the report.
    pub fn run(&self) -> Result<RunReport, AbortedRun> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("lexis.run", run_id = %run_id);
        let _guard = span.enter();

        let mut run = RunTracker::new(run_id);
        info!(
            backend = self.config.store.backend.as_str(),
            table = %self.config.store.table,
            check_duplicates = self.config.pipeline.check_duplicates,
            "run started"
        );

        let (mut gateway, generator) = match self.init() {
            Ok(parts) => parts,
            Err(error) => {
                error!(error = %error, "run aborted during setup");
                run.advance(PipelineState::Aborted);
                return Err(AbortedRun {
                    report: run.finish(),
                    error,
                });
            }
        };

        let store = &self.config.store;
        let mut snapshot = if self.config.pipeline.check_duplicates {
            run.advance(PipelineState::FetchingCorpus);
            gateway.read_existing(&store.keyword_column, &store.table)
        } else {
            info!("duplicate checking disabled, treating corpus as empty");
            HashSet::new()
        };

        run.advance(PipelineState::Generating);
        let outcome = generator.generate(&GenerationRequest::from_config(&self.config.generation));
        if let Some(failure) = &outcome.failure {
            warn!(error = %failure, "generation degraded to zero candidates");
            run.degradations.push(DegradationEvent::now(
                "generation",
                failure.to_string(),
                "zero candidates",
            ));
        }
        run.summary.generated_count = outcome.records.len();

        if outcome.records.is_empty() {
            info!("no candidates generated");
            run.advance(PipelineState::Done);
            return Ok(self.complete(run, &mut gateway));
        }

        run.advance(PipelineState::Filtering);
        let filtered = filter_new(outcome.records, &mut snapshot);
        run.summary.duplicate_count = filtered.duplicate_count;
        info!(
            new = filtered.new_records.len(),
            duplicates = filtered.duplicate_count,
            "candidates filtered"
        );

        if filtered.new_records.is_empty() {
            run.advance(PipelineState::Done);
            return Ok(self.complete(run, &mut gateway));
        }

        run.advance(PipelineState::Persisting);
        let appended = gateway.append(&filtered.new_records, &store.columns(), &store.table);
        run.summary.insertion_succeeded = appended.ok;
        run.summary.inserted_count = if appended.ok { appended.rows_written } else { 0 };

        run.advance(PipelineState::Done);
        Ok(self.complete(run, &mut gateway))
    }

    /// Resolve the API key, connect the store, build the generator.
    fn init(&self) -> LexisResult<(CorpusGateway, KeywordGenerator)> {
        let api_key = resolve_api_key(&self.config.credentials, self.env.secrets.as_ref())?;
        let store = self.env.connector.connect(&self.config.store)?;
        let provider = self.env.generators.build(&api_key, &self.config.generation)?;
        let generator = KeywordGenerator::new(provider);
        info!(
            store = store.name(),
            provider = generator.provider_name(),
            "collaborators initialized"
        );
        Ok((CorpusGateway::new(store), generator))
    }

    fn complete(&self, mut run: RunTracker, gateway: &mut CorpusGateway) -> RunReport {
        run.degradations.extend(gateway.drain_events());
        let report = run.finish();
        let summary = &report.summary;
        info!(
            state = %report.final_state,
            generated = summary.generated_count,
            duplicates = summary.duplicate_count,
            inserted = summary.inserted_count,
            insertion_succeeded = summary.insertion_succeeded,
            degradations = report.degradations.len(),
            "run finished"
        );
        report
    }
}
