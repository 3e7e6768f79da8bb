//! # lexis-server
//!
//! Outer surfaces of the keyword service: the HTTP trigger, the CLI, tracing
//! initialization, and the wiring of production collaborators.

pub mod cli;
pub mod routes;
pub mod tracing_setup;
pub mod wiring;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use lexis_core::LexisConfig;
use lexis_pipeline::DedupPipeline;
use tracing::info;

pub use routes::{health_payload, router, AppState};

/// Bind the configured address and serve the trigger until the process exits.
pub async fn serve(config: LexisConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let env = wiring::production_environment(&config);
    let state = AppState {
        pipeline: Arc::new(DedupPipeline::new(config, env)),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "lexis trigger listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
