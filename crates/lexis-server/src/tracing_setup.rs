//! Tracing initialization.

use std::sync::Once;

use lexis_core::config::ObservabilityConfig;
use lexis_core::constants::ENV_LOG_FILTER;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the global subscriber.
///
/// `LEXIS_LOG` takes a full filter directive (`lexis_pipeline=debug,info`).
/// When it is unset or invalid, `observability.log_level` applies. Output is
/// JSON lines when `observability.json` is set.
///
/// Idempotent: later calls are no-ops.
pub fn init_tracing(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(ENV_LOG_FILTER)
            .or_else(|_| EnvFilter::try_new(&config.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let registry = tracing_subscriber::registry().with(filter);
        if config.json {
            registry
                .with(fmt::layer().json().with_target(true).with_current_span(true))
                .init();
        } else {
            registry.with(fmt::layer().with_target(true)).init();
        }
    });
}
