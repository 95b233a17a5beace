//! Batch runner configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the batch runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of recommendation requests in flight at once.
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
}

fn default_concurrency_limit() -> usize {
    5
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
        }
    }
}
