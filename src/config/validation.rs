use crate::config::types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::harvest::Selectors;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Selectors::compile(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the target site
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.origin, e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "origin '{}' must use http or https",
            config.origin
        )));
    }

    if config.listing_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "listing_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // request_delay_ms may be zero (fixture runs)

    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.snapshot_path.is_empty() {
        return Err(ConfigError::Validation(
            "snapshot_path cannot be empty".to_string(),
        ));
    }

    if let Some(failures_path) = &config.failures_path {
        if failures_path.is_empty() {
            return Err(ConfigError::Validation(
                "failures_path cannot be empty when set".to_string(),
            ));
        }
        if *failures_path == config.snapshot_path {
            return Err(ConfigError::Validation(
                "failures_path must differ from snapshot_path".to_string(),
            ));
        }
    }

    Ok(())
}
