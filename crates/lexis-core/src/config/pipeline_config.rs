use serde::{Deserialize, Serialize};

use super::defaults;

/// Dedup pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Read the existing corpus and drop candidates already present.
    pub check_duplicates: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            check_duplicates: defaults::DEFAULT_CHECK_DUPLICATES,
        }
    }
}
