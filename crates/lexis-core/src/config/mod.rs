//! Service configuration.
//!
//! One immutable [`LexisConfig`] value is built at startup (TOML file, then
//! environment overrides) and handed explicitly to every component.

mod credentials_config;
pub mod defaults;
mod generation_config;
mod observability_config;
mod pipeline_config;
mod server_config;
mod store_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use credentials_config::CredentialsConfig;
pub use generation_config::GenerationConfig;
pub use observability_config::ObservabilityConfig;
pub use pipeline_config::PipelineConfig;
pub use server_config::ServerConfig;
pub use store_config::{ColumnSet, StoreBackend, StoreConfig};

use crate::constants::{ENV_API_KEY, ENV_CONFIG_PATH, ENV_PORT, ENV_PROJECT_ID};
use crate::errors::{LexisError, LexisResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LexisConfig {
    pub store: StoreConfig,
    pub generation: GenerationConfig,
    pub pipeline: PipelineConfig,
    pub credentials: CredentialsConfig,
    pub server: ServerConfig,
    pub observability: ObservabilityConfig,
}

impl LexisConfig {
    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> LexisResult<Self> {
        toml::from_str(toml_str).map_err(|e| LexisError::config("toml", e.to_string()))
    }

    /// Read configuration from a TOML file.
    pub fn from_file(path: &Path) -> LexisResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LexisError::config("path", format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Build the runtime configuration: optional file, then process
    /// environment overrides, then validation.
    ///
    /// An explicit `path` wins over `LEXIS_CONFIG`.
    pub fn load(path: Option<&Path>) -> LexisResult<Self> {
        let env_path = std::env::var(ENV_CONFIG_PATH).ok();
        let mut config = match path.or(env_path.as_deref().map(Path::new)) {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Empty values are treated as unset. A `PORT` that is not a valid
    /// port number is a configuration error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> LexisResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(project) = get(ENV_PROJECT_ID) {
            self.credentials.project_id = Some(project);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.credentials.gemini_api_key = Some(key);
        }
        if let Some(port) = get(ENV_PORT) {
            self.server.port = port.trim().parse::<u16>().map_err(|e| {
                LexisError::config(ENV_PORT, format!("{port:?} is not a port number: {e}"))
            })?;
        }
        Ok(())
    }

    /// Reject values no run could succeed with.
    pub fn validate(&self) -> LexisResult<()> {
        if self.generation.count == 0 {
            return Err(LexisError::config(
                "generation.count",
                "must request at least one keyword",
            ));
        }
        if self.generation.model.trim().is_empty() {
            return Err(LexisError::config("generation.model", "must not be empty"));
        }
        check_identifier("store.table", &self.store.table)?;
        check_identifier("store.keyword_column", &self.store.keyword_column)?;
        if let Some(col) = &self.store.category_column {
            check_identifier("store.category_column", col)?;
        }
        if let Some(col) = &self.store.description_column {
            check_identifier("store.description_column", col)?;
        }
        Ok(())
    }
}

/// Table and column names are interpolated into queries, so only a
/// conservative character set is accepted.
pub fn is_valid_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn check_identifier(field: &str, value: &str) -> LexisResult<()> {
    if is_valid_identifier(value) {
        Ok(())
    } else {
        Err(LexisError::config(
            field,
            format!("{value:?} must be non-empty and use only [A-Za-z0-9_.-]"),
        ))
    }
}
