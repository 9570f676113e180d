//! Configuration module for Sumi-Migrate
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_migrate::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("migrate.toml")).unwrap();
//! println!("Migrating {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_exclude_patterns, AssetConfig, Config, CrawlerConfig, FilterConfig, OutputConfig,
    SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
