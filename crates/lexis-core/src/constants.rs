/// Lexis system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "lexis-keywords";

/// Category assigned to a generated keyword that arrives without a usable one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Environment variable holding the Google Cloud project identifier.
pub const ENV_PROJECT_ID: &str = "GCP_PROJECT_ID";

/// Environment variable holding the language-model API key.
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";

/// Environment variable overriding the HTTP listen port.
pub const ENV_PORT: &str = "PORT";

/// Environment variable pointing at a TOML config file.
pub const ENV_CONFIG_PATH: &str = "LEXIS_CONFIG";

/// Environment variable carrying a `tracing` filter directive.
pub const ENV_LOG_FILTER: &str = "LEXIS_LOG";
