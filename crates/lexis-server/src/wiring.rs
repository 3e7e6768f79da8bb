//! Production collaborators.
//!
//! Nothing here opens a network client up front: every client is built
//! inside a run, on the blocking worker that executes it.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use lexis_cloud::{
    BigQueryCorpusStore, GcpHttpClient, HttpClientConfig, SecretManagerStore, TokenSource,
};
use lexis_core::config::{CredentialsConfig, StoreBackend, StoreConfig};
use lexis_core::errors::{LexisResult, StorageError};
use lexis_core::traits::{ICorpusStore, ISecretStore, IStoreConnector};
use lexis_core::{LexisConfig, LexisError};
use lexis_generation::GeminiFactory;
use lexis_pipeline::RunEnvironment;
use lexis_storage::{InMemoryCorpusStore, SqliteCorpusStore};
use tracing::debug;

fn cloud_http_config() -> HttpClientConfig {
    HttpClientConfig {
        timeout: Duration::from_secs(30),
        max_retries: 3,
        initial_backoff: Duration::from_millis(500),
        max_backoff: Duration::from_secs(8),
    }
}

fn cloud_client(credentials: &CredentialsConfig) -> LexisResult<GcpHttpClient> {
    let tokens = TokenSource::from_config(credentials)?;
    GcpHttpClient::new(cloud_http_config(), tokens)
}

/// Connects the configured store backend.
///
/// The memory backend is shared across runs for the life of the process.
#[derive(Clone)]
pub struct BackendConnector {
    credentials: CredentialsConfig,
    memory: InMemoryCorpusStore,
}

impl BackendConnector {
    pub fn new(credentials: CredentialsConfig) -> Self {
        Self {
            credentials,
            memory: InMemoryCorpusStore::new(),
        }
    }

    /// The process-local store used by the memory backend.
    pub fn memory_store(&self) -> &InMemoryCorpusStore {
        &self.memory
    }
}

impl IStoreConnector for BackendConnector {
    fn connect(&self, config: &StoreConfig) -> LexisResult<Box<dyn ICorpusStore>> {
        debug!(backend = config.backend.as_str(), "connecting corpus store");
        match config.backend {
            StoreBackend::Memory => Ok(Box::new(self.memory.clone())),
            StoreBackend::Sqlite => {
                let store = SqliteCorpusStore::open(Path::new(&config.sqlite_path))?;
                store.ensure_table(&config.table, &config.columns())?;
                Ok(Box::new(store))
            }
            StoreBackend::BigQuery => {
                let client = cloud_client(&self.credentials).map_err(|e| {
                    LexisError::from(StorageError::ConnectFailed {
                        backend: "bigquery".to_string(),
                        reason: e.to_string(),
                    })
                })?;
                let store = BigQueryCorpusStore::connect(
                    client,
                    self.credentials.project_id.clone(),
                    config.bigquery_location.clone(),
                )?;
                Ok(Box::new(store))
            }
        }
    }
}

/// Secret Manager access, bound to the configured project at lookup time.
pub struct CloudSecretStore {
    credentials: CredentialsConfig,
}

impl CloudSecretStore {
    pub fn new(credentials: CredentialsConfig) -> Self {
        Self { credentials }
    }
}

impl ISecretStore for CloudSecretStore {
    fn get_secret(&self, secret_id: &str) -> LexisResult<String> {
        let project = self
            .credentials
            .project_id
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                LexisError::config("credentials.project_id", "required for secret lookups")
            })?;
        let client = cloud_client(&self.credentials)?;
        SecretManagerStore::new(client, project, &self.credentials.secret_version)
            .get_secret(secret_id)
    }
}

/// Collaborators for a production run of `config`.
pub fn production_environment(config: &LexisConfig) -> RunEnvironment {
    RunEnvironment {
        secrets: Arc::new(CloudSecretStore::new(config.credentials.clone())),
        connector: Arc::new(BackendConnector::new(config.credentials.clone())),
        generators: Arc::new(GeminiFactory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexis_core::models::KeywordRecord;

    #[test]
    fn memory_backend_is_shared_across_connects() {
        let connector = BackendConnector::new(CredentialsConfig::default());
        let config = StoreConfig {
            backend: StoreBackend::Memory,
            table: "keys".to_string(),
            ..Default::default()
        };
        let record = KeywordRecord::new("מניות", None, None).unwrap();

        let first = connector.connect(&config).unwrap();
        first
            .append(&[record], &config.columns(), &config.table)
            .unwrap();
        let second = connector.connect(&config).unwrap();
        let existing = second
            .read_existing(&config.keyword_column, &config.table)
            .unwrap();
        assert!(existing.contains("מניות"));
        assert_eq!(connector.memory_store().row_count("keys"), 1);
    }

    #[test]
    fn sqlite_backend_creates_its_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: StoreBackend::Sqlite,
            table: "keys".to_string(),
            sqlite_path: dir.path().join("wiring.db").display().to_string(),
            ..Default::default()
        };
        let store = BackendConnector::new(CredentialsConfig::default())
            .connect(&config)
            .unwrap();
        assert!(store
            .read_existing(&config.keyword_column, &config.table)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn secret_lookup_without_project_is_configuration_error() {
        let store = CloudSecretStore::new(CredentialsConfig::default());
        let err = store.get_secret("gemini-api-key").unwrap_err();
        assert!(matches!(err, LexisError::Configuration { .. }));
    }
}
