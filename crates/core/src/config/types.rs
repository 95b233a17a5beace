use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use crate::batch::BatchConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Helpdesk backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Backend base URL (e.g., "http://127.0.0.1:5000")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Optional bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_timeout() -> u32 {
    30
}

/// Preference storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_preferences_path")]
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("triage-preferences.json")
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human-readable format
    #[serde(default)]
    pub json: bool,
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub backend: SanitizedBackendConfig,
    pub batch: BatchConfig,
    pub preferences: PreferencesConfig,
    pub logging: LoggingConfig,
}

/// Sanitized backend config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedBackendConfig {
    pub base_url: String,
    pub timeout_secs: u32,
    pub api_token_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            backend: SanitizedBackendConfig {
                base_url: config.backend.base_url.clone(),
                timeout_secs: config.backend.timeout_secs,
                api_token_configured: config
                    .backend
                    .api_token
                    .as_ref()
                    .is_some_and(|t| !t.is_empty()),
            },
            batch: config.batch.clone(),
            preferences: config.preferences.clone(),
            logging: config.logging.clone(),
        }
    }
}
