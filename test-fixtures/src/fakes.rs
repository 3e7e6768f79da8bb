//! Deterministic stand-ins for the external collaborators.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use lexis_core::config::{ColumnSet, GenerationConfig, StoreConfig};
use lexis_core::errors::{CredentialError, GenerationError, LexisResult, StorageError};
use lexis_core::models::{AppendOutcome, KeywordRecord};
use lexis_core::traits::{
    ICorpusStore, IGeneratorFactory, ISecretStore, IStoreConnector, ITextGenerator,
};

// --- Text generation ---

/// Returns the same raw response for every prompt and counts calls.
#[derive(Clone)]
pub struct ScriptedGenerator {
    response: String,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ITextGenerator for ScriptedGenerator {
    fn generate(&self, prompt: &str) -> LexisResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Always fails like an unreachable model API.
#[derive(Clone, Default)]
pub struct FailingGenerator;

impl ITextGenerator for FailingGenerator {
    fn generate(&self, _prompt: &str) -> LexisResult<String> {
        Err(GenerationError::RequestFailed {
            provider: "failing".to_string(),
            reason: "mock failure".to_string(),
        }
        .into())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Hands out a prepared generator and records the API keys it was given.
#[derive(Clone)]
pub struct FixedGeneratorFactory {
    generator: Arc<dyn ITextGenerator>,
    api_keys: Arc<Mutex<Vec<String>>>,
}

impl FixedGeneratorFactory {
    pub fn new(generator: impl ITextGenerator + 'static) -> Self {
        Self {
            generator: Arc::new(generator),
            api_keys: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn api_keys(&self) -> Vec<String> {
        self.api_keys.lock().unwrap().clone()
    }
}

struct SharedGenerator(Arc<dyn ITextGenerator>);

impl ITextGenerator for SharedGenerator {
    fn generate(&self, prompt: &str) -> LexisResult<String> {
        self.0.generate(prompt)
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

impl IGeneratorFactory for FixedGeneratorFactory {
    fn build(
        &self,
        api_key: &str,
        _config: &GenerationConfig,
    ) -> LexisResult<Box<dyn ITextGenerator>> {
        self.api_keys.lock().unwrap().push(api_key.to_string());
        Ok(Box::new(SharedGenerator(Arc::clone(&self.generator))))
    }
}

// --- Corpus store ---

#[derive(Default)]
struct RecordingState {
    existing: HashSet<String>,
    batches: Vec<Vec<KeywordRecord>>,
    reads: usize,
}

/// In-memory corpus that records every append batch.
///
/// Clones share state, so a test can keep one handle and give another to
/// the code under test.
#[derive(Clone, Default)]
pub struct RecordingStore {
    state: Arc<Mutex<RecordingState>>,
    fail_reads: bool,
    fail_writes: bool,
    persist_appends: bool,
}

impl RecordingStore {
    /// A store seeded with `existing` keyword texts. Appends are kept.
    pub fn with_existing<I, S>(existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self {
            persist_appends: true,
            ..Default::default()
        };
        store.state.lock().unwrap().existing = existing.into_iter().map(Into::into).collect();
        store
    }

    /// Reads raise an error.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Appends raise an error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Appends are recorded but not added to the corpus.
    pub fn frozen(mut self) -> Self {
        self.persist_appends = false;
        self
    }

    /// Every batch passed to `append`, including empty ones.
    pub fn batches(&self) -> Vec<Vec<KeywordRecord>> {
        self.state.lock().unwrap().batches.clone()
    }

    /// Texts of every appended record, in order.
    pub fn appended_texts(&self) -> Vec<String> {
        self.batches()
            .iter()
            .flatten()
            .map(|r| r.text().to_string())
            .collect()
    }

    pub fn read_count(&self) -> usize {
        self.state.lock().unwrap().reads
    }
}

impl ICorpusStore for RecordingStore {
    fn read_existing(&self, _column: &str, table: &str) -> LexisResult<HashSet<String>> {
        let mut state = self.state.lock().unwrap();
        state.reads += 1;
        if self.fail_reads {
            return Err(StorageError::ReadFailed {
                table: table.to_string(),
                reason: "mock read failure".to_string(),
            }
            .into());
        }
        Ok(state.existing.clone())
    }

    fn append(
        &self,
        rows: &[KeywordRecord],
        _columns: &ColumnSet,
        table: &str,
    ) -> LexisResult<AppendOutcome> {
        let mut state = self.state.lock().unwrap();
        state.batches.push(rows.to_vec());
        if self.fail_writes {
            return Err(StorageError::WriteFailed {
                table: table.to_string(),
                reason: "mock write failure".to_string(),
            }
            .into());
        }
        if self.persist_appends {
            state
                .existing
                .extend(rows.iter().map(|r| r.text().to_string()));
        }
        Ok(AppendOutcome::success(rows.len()))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Connects to a shared [`RecordingStore`], or fails to initialize.
#[derive(Clone)]
pub struct FixedConnector {
    store: Option<RecordingStore>,
    connects: Arc<AtomicUsize>,
}

impl FixedConnector {
    pub fn new(store: RecordingStore) -> Self {
        Self {
            store: Some(store),
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A connector whose store client never initializes.
    pub fn unreachable() -> Self {
        Self {
            store: None,
            connects: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl IStoreConnector for FixedConnector {
    fn connect(&self, config: &StoreConfig) -> LexisResult<Box<dyn ICorpusStore>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match &self.store {
            Some(store) => Ok(Box::new(store.clone())),
            None => Err(StorageError::ConnectFailed {
                backend: config.backend.as_str().to_string(),
                reason: "mock connection refused".to_string(),
            }
            .into()),
        }
    }
}

// --- Secrets ---

/// Secret store backed by a map. Unknown ids fail like a missing secret.
#[derive(Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
    lookups: Arc<AtomicUsize>,
}

impl StaticSecretStore {
    pub fn with_secret(secret_id: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.secrets.insert(secret_id.to_string(), value.to_string());
        store
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ISecretStore for StaticSecretStore {
    fn get_secret(&self, secret_id: &str) -> LexisResult<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.secrets.get(secret_id).cloned().ok_or_else(|| {
            CredentialError::SecretUnavailable {
                secret_id: secret_id.to_string(),
                reason: "not found".to_string(),
            }
            .into()
        })
    }
}
