//! HTTP transport shared by the Google Cloud clients.

mod http_client;

pub use http_client::{GcpHttpClient, HttpClientConfig};
