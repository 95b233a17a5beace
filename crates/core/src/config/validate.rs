use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Backend section exists (enforced by serde)
/// - Backend URL is http(s)
/// - Timeout and concurrency limit are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let url = config.backend.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "backend.base_url must start with http:// or https://, got {:?}",
            config.backend.base_url
        )));
    }

    if config.backend.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "backend.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.batch.concurrency_limit == 0 {
        return Err(ConfigError::ValidationError(
            "batch.concurrency_limit cannot be 0".to_string(),
        ));
    }

    Ok(())
}
