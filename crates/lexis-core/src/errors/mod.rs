//! Error taxonomy for every stage of a keyword run.

mod cloud_error;
mod credential_error;
mod generation_error;
mod lexis_error;
mod storage_error;

pub use cloud_error::CloudError;
pub use credential_error::CredentialError;
pub use generation_error::GenerationError;
pub use lexis_error::{LexisError, LexisResult};
pub use storage_error::StorageError;
