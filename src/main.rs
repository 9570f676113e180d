//! Sumi-Migrate main entry point
//!
//! This is the command-line interface for the Sumi-Migrate website migrator.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use sumi_migrate::config::{load_config_with_hash, Config};
use sumi_migrate::output::print_summary;
use sumi_migrate::{Coordinator, RunMode};
use tracing_subscriber::EnvFilter;

/// Sumi-Migrate: A polite website content migrator
///
/// Sumi-Migrate discovers every page of a source website through its sitemap
/// (or by crawling), extracts content, forms, analytics and navigation, and
/// writes markdown documents, JSON reports and image assets.
#[derive(Parser, Debug)]
#[command(name = "sumi-migrate")]
#[command(version = "1.0.0")]
#[command(about = "A polite website content migrator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Which pages to migrate
    #[arg(long, value_enum, default_value_t = Pages::All)]
    pages: Pages,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be migrated without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Pages {
    /// Homepage, navigation and logo only
    Homepage,
    /// Every discoverable page
    All,
}

impl From<Pages> for RunMode {
    fn from(pages: Pages) -> Self {
        match pages {
            Pages::Homepage => RunMode::Homepage,
            Pages::All => RunMode::FullSite,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, cli.pages);
        return Ok(());
    }

    handle_migration(config, config_hash, cli.pages.into()).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_migrate=info,warn"),
            1 => EnvFilter::new("sumi_migrate=debug,info"),
            2 => EnvFilter::new("sumi_migrate=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: prints the validated configuration
fn handle_dry_run(config: &Config, pages: Pages) {
    println!("=== Sumi-Migrate Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Name: {}", config.site.site_name);
    println!("  Sitemap: {}", config.site.sitemap_path);
    println!("  Pages: {:?}", pages);

    println!("\nCrawler Configuration:");
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!(
        "  Retries: {} (base delay {}ms)",
        config.crawler.max_retries, config.crawler.retry_delay_ms
    );
    println!(
        "  Timeouts: {}s requests, {}s downloads",
        config.crawler.request_timeout_secs, config.crawler.download_timeout_secs
    );
    println!("  Max redirects: {}", config.crawler.max_redirects);
    println!("  Respect robots.txt: {}", config.crawler.respect_robots_txt);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!(
        "  Content: {} (*.{})",
        config.output.content_dir, config.output.document_extension
    );
    println!("  Data: {}", config.output.data_dir);
    println!("  Reports: {}", config.output.reports_dir);
    println!("  Public: {}", config.output.public_dir);

    println!(
        "\nExclusion Patterns ({}):",
        config.filter.exclude_patterns.len()
    );
    for pattern in &config.filter.exclude_patterns {
        println!("  - {}", pattern);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main migration run
async fn handle_migration(config: Config, config_hash: String, mode: RunMode) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::new(config, config_hash)?;

    match coordinator.run(mode).await {
        Ok(summary) => {
            tracing::info!("Migration completed successfully");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Migration failed: {}", e);
            Err(e.into())
        }
    }
}
