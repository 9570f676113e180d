//! Migration coordinator - main orchestration logic
//!
//! This module sequences the phases of a run:
//! - Loading robots.txt and adjusting the politeness delay
//! - Extracting navigation from the homepage
//! - Discovering URLs (sitemap, then crawl)
//! - Fetching and extracting every page into the page map
//! - Writing documents, reports and assets
//!
//! The coordinator is the only owner of the page map and failure counters.

use crate::config::Config;
use crate::crawler::discovery::Discoverer;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::{FetchResult, Fetcher};
use crate::extract::{
    detect_analytics, extract_content, extract_forms, extract_navigation, MarkdownConverter,
    NavigationTree,
};
use crate::output::{
    download_images, download_logo, write_documents, write_navigation, write_reports, RunSummary,
};
use crate::robots::{fetch_robots, RobotsRules};
use crate::state::{PageMap, PageRecord};
use crate::url::{CanonicalUrl, UrlFilter};
use crate::{MigrateError, Result};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Homepage content, navigation, logo and homepage images only
    Homepage,
    /// Every discoverable page
    FullSite,
}

/// Main migration coordinator structure
pub struct Coordinator {
    config: Config,
    config_hash: String,
    filter: UrlFilter,
    fetcher: Fetcher,
    scheduler: Scheduler,
    converter: MarkdownConverter,
    robots: RobotsRules,
    pages: PageMap,
    failed_urls: Vec<String>,
    summary: RunSummary,
}

impl Coordinator {
    /// Creates a new coordinator from a validated configuration
    ///
    /// `config_hash` is recorded in the migration report.
    pub fn new(config: Config, config_hash: impl Into<String>) -> Result<Self> {
        let filter = UrlFilter::from_config(&config)?;
        let fetcher = Fetcher::new(&config.user_agent, &config.crawler)?;
        let scheduler = Scheduler::new(&config.crawler);
        let robots = RobotsRules::allow_all(&config.user_agent.crawler_name);

        Ok(Self {
            config,
            config_hash: config_hash.into(),
            filter,
            fetcher,
            scheduler,
            converter: MarkdownConverter::new(),
            robots,
            pages: PageMap::new(),
            failed_urls: Vec::new(),
            summary: RunSummary::default(),
        })
    }

    /// Extracted pages, in processing order
    pub fn pages(&self) -> &PageMap {
        &self.pages
    }

    /// URLs dropped after exhausting retries
    pub fn failed_urls(&self) -> &[String] {
        &self.failed_urls
    }

    /// Runs the migration
    ///
    /// Per-page failures are counted in the returned summary. Only
    /// structural failures (unwritable outputs, an unreachable homepage in
    /// homepage mode) return an error.
    pub async fn run(&mut self, mode: RunMode) -> Result<RunSummary> {
        let start_time = Instant::now();
        info!(
            "Starting {} migration of {}",
            match mode {
                RunMode::Homepage => "homepage",
                RunMode::FullSite => "full-site",
            },
            self.filter.base()
        );

        self.load_robots().await;

        match mode {
            RunMode::Homepage => self.run_homepage().await?,
            RunMode::FullSite => self.run_full_site().await?,
        }

        self.summary.extracted = self.pages.len();
        self.summary.failed = self.failed_urls.len();
        self.summary.log();
        info!(
            "Migration finished in {:?} after {} requests",
            start_time.elapsed(),
            self.scheduler.requests()
        );

        Ok(self.summary.clone())
    }

    async fn load_robots(&mut self) {
        if !self.config.crawler.respect_robots_txt {
            debug!("robots.txt checks disabled");
            return;
        }

        self.scheduler.wait().await;
        self.robots = fetch_robots(
            &self.fetcher,
            self.filter.base(),
            &self.config.user_agent.crawler_name,
        )
        .await;

        if let Some(delay) = self.robots.crawl_delay() {
            info!("robots.txt requests a crawl delay of {:?}", delay);
            self.scheduler.raise_delay(delay);
        }
    }

    /// Homepage-only run
    async fn run_homepage(&mut self) -> Result<()> {
        let homepage = self.filter.homepage();

        self.scheduler.wait().await;
        let body = match self.fetcher.fetch(homepage.as_str()).await {
            FetchResult::Success { body, .. } => body,
            FetchResult::Failed { attempts, error } => {
                warn!(
                    "Homepage {} failed after {} attempts: {}",
                    homepage, attempts, error
                );
                return Err(MigrateError::HomepageUnavailable {
                    url: homepage.to_string(),
                });
            }
        };
        self.summary.discovered = 1;

        self.navigation_phase(&body).await?;

        let record = self.extract_record(&homepage, &body)?;
        self.pages.insert(homepage.key(), record);

        self.write_outputs().await
    }

    /// Full-site run
    async fn run_full_site(&mut self) -> Result<()> {
        let homepage = self.filter.homepage();

        // Navigation runs once, ahead of the per-URL loop
        self.scheduler.wait().await;
        let homepage_body = self.fetcher.fetch(homepage.as_str()).await.into_body();
        match &homepage_body {
            Some(body) => {
                self.navigation_phase(body).await?;
            }
            None => warn!("Homepage unavailable, skipping navigation extraction"),
        }

        let sitemap_url = self.filter.base().join(&self.config.site.sitemap_path)?;
        let discovery = Discoverer::new(
            &self.fetcher,
            &mut self.scheduler,
            &self.filter,
            &self.robots,
        )
        .discover(&sitemap_url)
        .await;

        self.summary.discovered = discovery.urls.len();
        info!(
            "Extracting {} pages (discovered via {:?})",
            discovery.urls.len(),
            discovery.source
        );

        let total = discovery.urls.len();
        for (i, url) in discovery.urls.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, total, url);

            let cached = if *url == homepage {
                homepage_body.clone()
            } else {
                None
            };

            self.process_url(url, cached).await?;
        }

        self.write_outputs().await
    }

    /// Fetches (unless already fetched) and extracts a single page
    ///
    /// A page that fails every retry is dropped and counted.
    async fn process_url(&mut self, url: &CanonicalUrl, cached: Option<String>) -> Result<()> {
        if self.pages.contains(url.key()) {
            return Ok(());
        }

        let body = match cached {
            Some(body) => body,
            None => {
                self.scheduler.wait().await;
                match self.fetcher.fetch(url.as_str()).await {
                    FetchResult::Success { body, .. } => body,
                    FetchResult::Failed { attempts, error } => {
                        warn!("Dropping {} after {} attempts: {}", url, attempts, error);
                        self.failed_urls.push(url.to_string());
                        return Ok(());
                    }
                }
            }
        };

        let record = self.extract_record(url, &body)?;
        debug!(
            "Extracted {}: {} forms, {} scripts, {} images",
            url,
            record.forms.len(),
            record.analytics_scripts.len(),
            record.images.len()
        );
        self.pages.insert(url.key(), record);
        Ok(())
    }

    /// Runs the content, form and analytics extractors over one page
    fn extract_record(&self, url: &CanonicalUrl, html: &str) -> Result<PageRecord> {
        let content = extract_content(html, url.url(), &self.config.site.site_name, &self.converter)
            .map_err(|e| MigrateError::Markdown {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(PageRecord {
            url: url.to_string(),
            title: content.title,
            description: content.description,
            raw_content_html: content.raw_content_html,
            markdown: content.markdown,
            seo: content.seo,
            images: content.images,
            forms: extract_forms(url.as_str(), html),
            analytics_scripts: detect_analytics(html),
        })
    }

    /// Extracts navigation from homepage HTML, downloads the logo and writes
    /// `navigation.json`
    async fn navigation_phase(&mut self, homepage_html: &str) -> Result<NavigationTree> {
        let mut navigation = extract_navigation(
            homepage_html,
            self.filter.base(),
            &self.config.site.site_name,
            &self.config.assets.default_logo,
        );
        info!(
            "Extracted {} header menu items and {} footer sections",
            navigation.header.menu.len(),
            navigation.footer.sections.len()
        );

        let public_dir = Path::new(&self.config.output.public_dir);
        if let Some(local) = download_logo(
            &self.fetcher,
            &mut self.scheduler,
            &navigation.header.logo,
            public_dir,
            &self.config.assets,
        )
        .await
        {
            navigation.header.logo = local;
        }

        write_navigation(Path::new(&self.config.output.data_dir), &navigation)?;
        Ok(navigation)
    }

    /// Writes documents and reports, then downloads every page image
    async fn write_outputs(&mut self) -> Result<()> {
        let output = &self.config.output;

        self.summary.documents_written = write_documents(&self.pages, &self.config)?;
        info!(
            "Wrote {} documents to {}",
            self.summary.documents_written, output.content_dir
        );

        write_reports(
            Path::new(&output.reports_dir),
            &self.pages,
            &self.failed_urls,
            &output.document_extension,
            &self.config_hash,
        )?;

        let images: Vec<&str> = self
            .pages
            .iter()
            .flat_map(|p| p.images.iter().map(String::as_str))
            .collect();
        let outcome = download_images(
            &self.fetcher,
            &mut self.scheduler,
            images,
            Path::new(&output.public_dir),
            &self.config.assets,
        )
        .await;

        self.summary.images_downloaded = outcome.downloaded;
        self.summary.images_failed = outcome.failed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn config() -> Config {
        parse_config(
            r#"
            [site]
            base-url = "https://example.com/"
            site-name = "Example"

            [user-agent]
            crawler-name = "TestBot"
            crawler-version = "1.0"
            contact-url = "https://example.com/bot"
            contact-email = "bot@example.com"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_new_coordinator_starts_empty() {
        let coordinator = Coordinator::new(config(), "hash").unwrap();
        assert!(coordinator.pages().is_empty());
        assert!(coordinator.failed_urls().is_empty());
    }

    #[test]
    fn test_extract_record_combines_extractors() {
        let coordinator = Coordinator::new(config(), "hash").unwrap();
        let url = coordinator.filter.homepage();
        let html = r#"
            <html><head><title>Home</title>
            <script src="https://www.googletagmanager.com/gtag/js?id=G-ABC"></script></head>
            <body><main><h1>Welcome</h1><img src="/hero.jpg">
            <form id="news"><input type="email" name="email" required></form></main></body></html>
        "#;

        let record = coordinator.extract_record(&url, html).unwrap();
        assert_eq!(record.url, "https://example.com/");
        assert_eq!(record.title, "Home");
        assert!(record.markdown.contains("# Welcome"));
        assert_eq!(record.images, vec!["https://example.com/hero.jpg".to_string()]);
        assert_eq!(record.forms.len(), 1);
        assert_eq!(record.forms[0].source_url, "https://example.com/");
        assert_eq!(record.analytics_scripts.len(), 1);
    }
}
