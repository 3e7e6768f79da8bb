//! # lexis-cloud
//!
//! Google Cloud collaborators reached over REST: access tokens from the
//! metadata server, Secret Manager lookups, and the BigQuery corpus store.

pub mod auth;
pub mod bigquery;
pub mod secret_manager;
pub mod transport;

pub use auth::TokenSource;
pub use bigquery::{BigQueryCorpusStore, TableRef};
pub use secret_manager::SecretManagerStore;
pub use transport::{GcpHttpClient, HttpClientConfig};
