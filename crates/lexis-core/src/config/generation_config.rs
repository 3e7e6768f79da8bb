use serde::{Deserialize, Serialize};

use super::defaults;

/// Keyword generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Keywords requested per run.
    pub count: usize,
    /// Industry or topic the keywords cover.
    pub topic: String,
    /// Natural language the keywords are written in.
    pub language: String,
    /// Model identifier passed to the provider.
    pub model: String,
    /// Category taxonomy offered to the model.
    pub categories: Vec<String>,
    /// Base URL of the generation API.
    pub endpoint: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            count: defaults::DEFAULT_KEYWORDS_PER_GENERATION,
            topic: defaults::DEFAULT_INDUSTRY_FOCUS.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            model: defaults::DEFAULT_MODEL.to_string(),
            categories: defaults::DEFAULT_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            endpoint: defaults::DEFAULT_GENERATION_ENDPOINT.to_string(),
            timeout_secs: defaults::DEFAULT_GENERATION_TIMEOUT_SECS,
            max_retries: defaults::DEFAULT_GENERATION_MAX_RETRIES,
        }
    }
}
