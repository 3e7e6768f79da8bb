/// Corpus store errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("store client could not be initialized ({backend}): {reason}")]
    ConnectFailed { backend: String, reason: String },

    #[error("reading {table} failed: {reason}")]
    ReadFailed { table: String, reason: String },

    #[error("appending to {table} failed: {reason}")]
    WriteFailed { table: String, reason: String },

    #[error("invalid identifier {identifier:?}: {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("SQLite error: {message}")]
    Sqlite { message: String },
}
