// Single source of truth for all default values.

// --- Store ---
pub const DEFAULT_KEYWORDS_TABLE: &str = "pwcnext-sandbox01.telegram.keys";
pub const DEFAULT_KEYWORD_COLUMN: &str = "keys_group";
pub const DEFAULT_SQLITE_PATH: &str = "lexis.db";

// --- Generation ---
pub const DEFAULT_KEYWORDS_PER_GENERATION: usize = 20;
pub const DEFAULT_INDUSTRY_FOCUS: &str = "stocks and finance";
pub const DEFAULT_LANGUAGE: &str = "Hebrew";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_GENERATION_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_GENERATION_MAX_RETRIES: u32 = 2;
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "trading",
    "analysis",
    "instruments",
    "strategy",
    "economic_indicators",
];

// --- Pipeline ---
pub const DEFAULT_CHECK_DUPLICATES: bool = true;

// --- Credentials ---
pub const DEFAULT_SECRET_ID: &str = "gemini-api-key";
pub const DEFAULT_SECRET_VERSION: &str = "latest";

// --- Server ---
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
