use crate::config::types::{
    AssetConfig, Config, CrawlerConfig, FilterConfig, OutputConfig, SiteConfig, UserAgentConfig,
};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_filter_config(&config.filter)?;
    validate_asset_config(&config.assets)?;
    Ok(())
}

/// Validates the source site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' has no host",
            config.base_url
        )));
    }

    if config.site_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site-name cannot be empty".to_string(),
        ));
    }

    if !config.sitemap_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "sitemap-path must start with '/', got '{}'",
            config.sitemap_path
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be at most 10, got {}",
            config.max_retries
        )));
    }

    if config.request_timeout_secs == 0 || config.download_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request and download timeouts must be at least 1 second".to_string(),
        ));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be at most 20, got {}",
            config.max_redirects
        )));
    }

    if config.request_delay_ms < 100 {
        tracing::warn!(
            "request-delay-ms is {}ms; the source site may treat this crawl as abusive",
            config.request_delay_ms
        );
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
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

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("content-dir", &config.content_dir),
        ("data-dir", &config.data_dir),
        ("reports-dir", &config.reports_dir),
        ("public-dir", &config.public_dir),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    if config.document_extension.is_empty()
        || !config
            .document_extension
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
    {
        return Err(ConfigError::Validation(format!(
            "document-extension must be alphanumeric, got '{}'",
            config.document_extension
        )));
    }

    Ok(())
}

/// Validates that every exclusion pattern compiles
fn validate_filter_config(config: &FilterConfig) -> Result<(), ConfigError> {
    for pattern in &config.exclude_patterns {
        Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
    }
    Ok(())
}

/// Validates asset placement configuration
fn validate_asset_config(config: &AssetConfig) -> Result<(), ConfigError> {
    if !config.uploads_segment.starts_with('/') || !config.uploads_segment.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "uploads-segment must start and end with '/', got '{}'",
            config.uploads_segment
        )));
    }

    if config.images_dir.is_empty() || config.images_dir.contains("..") {
        return Err(ConfigError::Validation(format!(
            "images-dir must be a plain relative directory, got '{}'",
            config.images_dir
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
