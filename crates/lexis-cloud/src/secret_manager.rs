//! Secret Manager lookups over REST.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use lexis_core::errors::{CredentialError, LexisError, LexisResult};
use lexis_core::traits::ISecretStore;
use serde::Deserialize;
use tracing::info;

use crate::transport::GcpHttpClient;

const SECRET_MANAGER_URL: &str = "https://secretmanager.googleapis.com/v1";

#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    data: String,
}

/// Reads secret versions from one project.
pub struct SecretManagerStore {
    client: GcpHttpClient,
    project_id: String,
    version: String,
    base_url: String,
}

impl SecretManagerStore {
    pub fn new(client: GcpHttpClient, project_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            client,
            project_id: project_id.into(),
            version: version.into(),
            base_url: SECRET_MANAGER_URL.to_string(),
        }
    }

    /// Point at a different API root (emulators, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn version_url(&self, secret_id: &str) -> String {
        format!(
            "{}/projects/{}/secrets/{}/versions/{}:access",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            secret_id,
            self.version
        )
    }
}

impl ISecretStore for SecretManagerStore {
    fn get_secret(&self, secret_id: &str) -> LexisResult<String> {
        info!(secret_id, project = %self.project_id, "retrieving secret");
        let resp: AccessSecretVersionResponse = self
            .client
            .get_json(&self.version_url(secret_id))
            .map_err(|e| secret_err(secret_id, e.to_string()))?;
        decode_payload(secret_id, &resp.payload.data)
    }
}

/// Secret payloads arrive base64-encoded. Trailing line breaks are dropped.
fn decode_payload(secret_id: &str, data: &str) -> LexisResult<String> {
    let bytes = STANDARD
        .decode(data)
        .map_err(|e| secret_err(secret_id, format!("payload is not base64: {e}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| secret_err(secret_id, format!("payload is not UTF-8: {e}")))?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

fn secret_err(secret_id: &str, reason: String) -> LexisError {
    CredentialError::SecretUnavailable {
        secret_id: secret_id.to_string(),
        reason,
    }
    .into()
}
