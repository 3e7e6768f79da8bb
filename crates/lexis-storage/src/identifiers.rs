//! Identifier checks for table and column names interpolated into queries.

use lexis_core::config::is_valid_identifier;
use lexis_core::errors::{LexisResult, StorageError};

/// Fail unless `name` is safe to splice into a query.
pub fn ensure_valid(name: &str) -> LexisResult<()> {
    if is_valid_identifier(name) {
        Ok(())
    } else {
        Err(StorageError::InvalidIdentifier {
            identifier: name.to_string(),
            reason: "only [A-Za-z0-9_.-] is allowed".to_string(),
        }
        .into())
    }
}

/// Validate and double-quote an identifier for SQLite.
pub fn quote_sqlite(name: &str) -> LexisResult<String> {
    ensure_valid(name)?;
    Ok(format!("\"{name}\""))
}

/// Validate and backtick-quote an identifier for BigQuery SQL.
pub fn quote_bigquery(name: &str) -> LexisResult<String> {
    ensure_valid(name)?;
    Ok(format!("`{name}`"))
}
