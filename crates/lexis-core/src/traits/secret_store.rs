use crate::errors::LexisResult;

/// Key-value lookup against a managed secret store.
pub trait ISecretStore: Send + Sync {
    fn get_secret(&self, secret_id: &str) -> LexisResult<String>;
}
