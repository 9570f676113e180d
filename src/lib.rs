//! Sumi-Migrate: a polite website content migrator
//!
//! This crate discovers every reachable page of a source website, fetches and
//! parses each page, and extracts structured content (markdown bodies, SEO
//! metadata, forms, analytics scripts, navigation, images) into artifacts that
//! an independent rendering system can consume.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sumi-Migrate operations
///
/// Per-page fetch failures are not errors: they are reported through
/// [`crawler::FetchResult::Failed`] and counted. Everything here aborts the run.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Homepage {url} could not be fetched")]
    HomepageUnavailable { url: String },

    #[error("Markdown conversion failed for {url}: {message}")]
    Markdown { url: String, message: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        source: serde_json::Error,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Migrate operations
pub type Result<T> = std::result::Result<T, MigrateError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, RunMode};
pub use output::RunSummary;
pub use state::{CrawlState, PageMap, PageRecord};
pub use url::{CanonicalUrl, UrlFilter};
