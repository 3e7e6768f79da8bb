use serde::{Deserialize, Serialize};

use super::defaults;

/// Which corpus store backend a run connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Google BigQuery over its REST API.
    BigQuery,
    /// Local SQLite database file.
    Sqlite,
    /// Process-local set, lost at exit.
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BigQuery => "bigquery",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        }
    }
}

/// Corpus store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend: "bigquery", "sqlite", "memory".
    pub backend: StoreBackend,
    /// Fully qualified table identifier.
    pub table: String,
    /// Column holding the keyword text.
    pub keyword_column: String,
    /// Optional column receiving the keyword category.
    pub category_column: Option<String>,
    /// Optional column receiving the keyword description.
    pub description_column: Option<String>,
    /// Database file for the SQLite backend.
    pub sqlite_path: String,
    /// BigQuery job location (e.g. "US", "EU").
    pub bigquery_location: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::BigQuery,
            table: defaults::DEFAULT_KEYWORDS_TABLE.to_string(),
            keyword_column: defaults::DEFAULT_KEYWORD_COLUMN.to_string(),
            category_column: None,
            description_column: None,
            sqlite_path: defaults::DEFAULT_SQLITE_PATH.to_string(),
            bigquery_location: None,
        }
    }
}

impl StoreConfig {
    /// The set of columns an append writes.
    pub fn columns(&self) -> ColumnSet {
        ColumnSet {
            keyword: self.keyword_column.clone(),
            category: self.category_column.clone(),
            description: self.description_column.clone(),
        }
    }
}

/// Target columns for an append. Only `keyword` is mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    pub keyword: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl ColumnSet {
    /// A column set writing only the keyword text.
    pub fn keyword_only(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            category: None,
            description: None,
        }
    }

    /// All configured column names, keyword first.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![self.keyword.as_str()];
        names.extend(self.category.as_deref());
        names.extend(self.description.as_deref());
        names
    }
}
