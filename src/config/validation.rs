use crate::config::types::{Config, CrawlerConfig, DownloadConfig, LlmConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_download_config(&config.download)?;
    validate_output_config(&config.output)?;
    validate_llm_config(&config.llm)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.download_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "download_timeout_secs must be >= 1, got {}",
            config.download_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates download configuration
fn validate_download_config(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "download directory cannot be empty".to_string(),
        ));
    }

    for extension in &config.extensions {
        validate_extension(extension)?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.sitemap_path.is_empty() {
        return Err(ConfigError::Validation(
            "sitemap_path cannot be empty".to_string(),
        ));
    }

    if matches!(config.report_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "report_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates language model configuration
fn validate_llm_config(config: &LlmConfig) -> Result<(), ConfigError> {
    if config.prompt.trim().is_empty() {
        return Err(ConfigError::Validation("prompt cannot be empty".to_string()));
    }

    if let Some(base_url) = &config.base_url {
        Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;
    }

    Ok(())
}

/// Validates a single target extension
///
/// A leading dot is tolerated (`.pdf`), anything else must be ASCII
/// alphanumeric.
fn validate_extension(extension: &str) -> Result<(), ConfigError> {
    let bare = extension.strip_prefix('.').unwrap_or(extension);

    if bare.is_empty() {
        return Err(ConfigError::InvalidExtension(
            "Extension cannot be empty".to_string(),
        ));
    }

    if !bare.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::InvalidExtension(format!(
            "Extension '{}' contains invalid characters",
            extension
        )));
    }

    Ok(())
}
