//! # lexis-pipeline
//!
//! One keyword run: resolve credentials, snapshot the corpus, generate
//! candidates, drop the ones already known, append the rest.

pub mod credentials;
pub mod filter;
pub mod pipeline;

pub use credentials::resolve_api_key;
pub use filter::{filter_new, FilterResult};
pub use pipeline::{AbortedRun, DedupPipeline, RunEnvironment};
