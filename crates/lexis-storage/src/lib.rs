//! # lexis-storage
//!
//! Corpus store backends (in-memory, SQLite) and [`CorpusGateway`], which
//! applies the run's degradation rules on top of any backend.

pub mod gateway;
pub mod identifiers;
pub mod memory_store;
pub mod sqlite;

pub use gateway::CorpusGateway;
pub use memory_store::InMemoryCorpusStore;
pub use sqlite::SqliteCorpusStore;

use lexis_core::errors::{LexisError, StorageError};

/// Convert a SQLite-level message into a `LexisError`.
pub(crate) fn to_storage_err(message: impl Into<String>) -> LexisError {
    StorageError::Sqlite {
        message: message.into(),
    }
    .into()
}
