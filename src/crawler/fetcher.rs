//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the migrator, including:
//! - Building the HTTP client with the configured identity
//! - GET requests with bounded retries and increasing delay
//! - Single-attempt requests for optional resources
//! - Streaming asset downloads to disk

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{redirect::Policy, Client};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the resource
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// Every attempt failed
    Failed {
        /// Number of attempts made
        attempts: u32,
        /// Description of the last failure
        error: String,
    },
}

impl FetchResult {
    /// Consumes the result, returning the body of a successful fetch
    pub fn into_body(self) -> Option<String> {
        match self {
            FetchResult::Success { body, .. } => Some(body),
            FetchResult::Failed { .. } => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sumi_migrate::config::{CrawlerConfig, UserAgentConfig};
/// use sumi_migrate::crawler::build_http_client;
///
/// let agent = UserAgentConfig {
///     crawler_name: "SumiMigrate".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&agent, &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(crawler.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Failure of a single streamed download
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DownloadError {
    fn from(e: reqwest::Error) -> Self {
        DownloadError::Http(e.to_string())
    }
}

/// HTTP fetcher with a fixed identity and retry policy
///
/// The fetcher never sleeps between distinct requests; the inter-request
/// delay is owned by the caller's scheduler. It only sleeps between retries
/// of the same request.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
    download_timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the crawler and user agent configuration
    pub fn new(agent: &UserAgentConfig, crawler: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(agent, crawler)?,
            max_retries: crawler.max_retries,
            retry_delay: Duration::from_millis(crawler.retry_delay_ms),
            download_timeout: Duration::from_secs(crawler.download_timeout_secs),
        })
    }

    /// Fetches a URL, retrying on non-2xx responses and network errors
    ///
    /// # Retry Logic
    ///
    /// | Attempt | Delay before attempt |
    /// |---------|----------------------|
    /// | 1       | none                 |
    /// | n + 1   | `retry_delay × n`    |
    ///
    /// An endpoint that always fails is tried exactly `max_retries + 1` times.
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let mut last_error = String::new();
        let total = self.max_retries + 1;

        for attempt in 1..=total {
            if attempt > 1 {
                let delay = self.retry_delay * (attempt - 1);
                warn!(
                    "Retrying {} in {:?} (attempt {}/{}): {}",
                    url, delay, attempt, total, last_error
                );
                tokio::time::sleep(delay).await;
            }

            match self.attempt(url).await {
                Ok(result) => return result,
                Err(e) => last_error = e,
            }
        }

        FetchResult::Failed {
            attempts: total,
            error: last_error,
        }
    }

    /// Fetches a URL with a single attempt and no retry
    pub async fn fetch_once(&self, url: &str) -> FetchResult {
        match self.attempt(url).await {
            Ok(result) => result,
            Err(error) => {
                debug!("Single fetch of {} failed: {}", url, error);
                FetchResult::Failed { attempts: 1, error }
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<FetchResult, String> {
        let response = self.client.get(url).send().await.map_err(describe)?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(describe)?;

        Ok(FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }

    /// Streams a URL into `dest`
    ///
    /// The body is written chunk by chunk to a temporary sibling file which is
    /// flushed, closed and renamed into place. On any failure the temporary
    /// file is removed and `dest` is left untouched.
    pub async fn download_to(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        let tmp = temp_sibling(dest);

        let result = self.stream_into(url, &tmp).await;
        match result {
            Ok(bytes) => {
                if let Err(e) = fs::rename(&tmp, dest).await {
                    let _ = fs::remove_file(&tmp).await;
                    return Err(e.into());
                }
                Ok(bytes)
            }
            Err(e) => {
                let _ = fs::remove_file(&tmp).await;
                Err(e)
            }
        }
    }

    async fn stream_into(&self, url: &str, tmp: &Path) -> Result<u64, DownloadError> {
        let mut response = self
            .client
            .get(url)
            .timeout(self.download_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Http(format!("HTTP {}", status.as_u16())));
        }

        // The handle is dropped at the end of this scope on every path
        let mut file = File::create(tmp).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

/// Temporary file path next to `dest`, used for atomic replacement
pub fn temp_sibling(dest: &Path) -> std::path::PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.part", name))
}

fn describe(e: reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    }
}
