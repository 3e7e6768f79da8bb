/// Credential resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("secret {secret_id} could not be retrieved: {reason}")]
    SecretUnavailable { secret_id: String, reason: String },

    #[error("access token unavailable: {reason}")]
    TokenUnavailable { reason: String },
}
