use super::{CloudError, CredentialError, GenerationError, StorageError};

/// Top-level error for the lexis service.
#[derive(Debug, thiserror::Error)]
pub enum LexisError {
    #[error("configuration error: {field}: {reason}")]
    Configuration { field: String, reason: String },

    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("cloud error: {0}")]
    Cloud(#[from] CloudError),

    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used across the workspace.
pub type LexisResult<T> = Result<T, LexisError>;

impl LexisError {
    /// Shorthand for a configuration error on a named field.
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error must abort a run instead of degrading it.
    ///
    /// Only setup failures are fatal: missing configuration, unresolvable
    /// credentials, and a store client that cannot be initialized.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Configuration { .. } | Self::Credential(_) => true,
            Self::Storage(StorageError::ConnectFailed { .. }) => true,
            Self::Storage(_) | Self::Cloud(_) | Self::Generation(_) | Self::Serialization(_) => {
                false
            }
        }
    }
}
