//! Model API key resolution.

use lexis_core::config::CredentialsConfig;
use lexis_core::errors::{CredentialError, LexisError, LexisResult};
use lexis_core::traits::ISecretStore;
use tracing::info;

/// The model API key: configured value first, then the secret store.
///
/// A secret lookup needs a project id. Without one, or without a secret
/// name, the run cannot be configured.
pub fn resolve_api_key(
    credentials: &CredentialsConfig,
    secrets: &dyn ISecretStore,
) -> LexisResult<String> {
    if let Some(key) = credentials
        .gemini_api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        info!("using configured model API key");
        return Ok(key.to_string());
    }

    let has_project = credentials
        .project_id
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());
    if !has_project {
        return Err(LexisError::config(
            "credentials.project_id",
            "required to fetch the model API key from the secret store",
        ));
    }
    if credentials.secret_id.trim().is_empty() {
        return Err(LexisError::config(
            "credentials.secret_id",
            "no model API key configured and no secret name to fetch it from",
        ));
    }

    let key = secrets.get_secret(&credentials.secret_id)?;
    if key.trim().is_empty() {
        return Err(CredentialError::SecretUnavailable {
            secret_id: credentials.secret_id.clone(),
            reason: "secret is empty".to_string(),
        }
        .into());
    }
    info!(secret_id = %credentials.secret_id, "model API key retrieved from secret store");
    Ok(key.trim().to_string())
}
