use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_migrate::config::load_config;
///
/// let config = load_config(Path::new("migrate.toml")).unwrap();
/// println!("Request delay: {}ms", config.crawler.request_delay_ms);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is recorded in the migration report so an audit can tell which
/// configuration produced a given set of artifacts.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const MINIMAL: &str = r#"
[site]
base-url = "https://example.com"
site-name = "Example Co"

[user-agent]
crawler-name = "TestMigrator"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#;

    #[test]
    fn test_load_minimal_config_applies_defaults() {
        let file = create_temp_config(MINIMAL);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.site_name, "Example Co");
        assert_eq!(config.site.sitemap_path, "/sitemap_index.xml");
        assert_eq!(config.crawler.max_retries, 3);
        assert_eq!(config.crawler.request_delay_ms, 1000);
        assert_eq!(config.crawler.max_redirects, 5);
        assert!(config.crawler.respect_robots_txt);
        assert_eq!(config.output.content_dir, "content/pages");
        assert_eq!(config.output.document_extension, "mdx");
        assert_eq!(config.assets.uploads_segment, "/wp-content/uploads/");
        assert_eq!(config.filter.exclude_patterns.len(), 7);
    }

    #[test]
    fn test_load_full_config() {
        let content = format!(
            "{}\n{}",
            MINIMAL,
            r#"
[crawler]
request-delay-ms = 250
retry-delay-ms = 500
max-retries = 1
respect-robots-txt = false

[output]
content-dir = "out/pages"
reports-dir = "out/reports"

[filter]
exclude-patterns = ["/private/"]
"#
        );
        let file = create_temp_config(&content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.request_delay_ms, 250);
        assert_eq!(config.crawler.max_retries, 1);
        assert!(!config.crawler.respect_robots_txt);
        assert_eq!(config.crawler.request_timeout_secs, 15);
        assert_eq!(config.output.content_dir, "out/pages");
        assert_eq!(config.output.data_dir, "content/data");
        assert_eq!(config.filter.exclude_patterns, vec!["/private/"]);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/migrate.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let content = MINIMAL.replace("https://example.com\"", "ftp://example.com\"");
        let file = create_temp_config(&content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
