use serde::{Deserialize, Serialize};

use super::defaults;

/// Credential sources for the model API and Google Cloud.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Google Cloud project identifier.
    pub project_id: Option<String>,
    /// Model API key. When absent it is fetched from the secret store.
    pub gemini_api_key: Option<String>,
    /// Secret name holding the model API key.
    pub secret_id: String,
    /// Secret version to access.
    pub secret_version: String,
    /// Static Google Cloud access token. When absent the metadata server is used.
    pub access_token: Option<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            gemini_api_key: None,
            secret_id: defaults::DEFAULT_SECRET_ID.to_string(),
            secret_version: defaults::DEFAULT_SECRET_VERSION.to_string(),
            access_token: None,
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("project_id", &self.project_id)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("secret_id", &self.secret_id)
            .field("secret_version", &self.secret_version)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
