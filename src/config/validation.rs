use crate::config::types::{Config, CrawlerConfig, ProgressConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_progress_config(&config.progress)?;
    Ok(())
}

/// Validates crawler configuration
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    validate_timeout("request_timeout_secs", config.request_timeout_secs)?;
    validate_timeout("connect_timeout_secs", config.connect_timeout_secs)?;

    if config.max_redirects > 50 {
        return Err(ConfigError::Validation(format!(
            "max_redirects must be <= 50, got {}",
            config.max_redirects
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates progress configuration
fn validate_progress_config(config: &ProgressConfig) -> Result<(), ConfigError> {
    if config.channel_capacity < 1 || config.channel_capacity > 65_536 {
        return Err(ConfigError::Validation(format!(
            "channel_capacity must be between 1 and 65536, got {}",
            config.channel_capacity
        )));
    }

    Ok(())
}

/// Timeouts must be finite and short enough to bound crawl latency
fn validate_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if !(1..=120).contains(&secs) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and 120 seconds, got {}",
            name, secs
        )));
    }
    Ok(())
}
