use serde::Deserialize;

/// Main configuration structure for Sumi-Migrate
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub assets: AssetConfig,
}

/// The source website being migrated
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Homepage URL; its host and port define the crawl boundary
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Fallback title and copyright owner
    #[serde(rename = "site-name")]
    pub site_name: String,

    /// Well-known sitemap location, relative to the base URL
    #[serde(rename = "sitemap-path", default = "default_sitemap_path")]
    pub sitemap_path: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Politeness delay between successive requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Base delay before a retry; retry n waits n times this (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Number of retries after the first failed attempt
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-request timeout for page fetches (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Per-request timeout for asset downloads (seconds)
    #[serde(rename = "download-timeout-secs", default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Skip URLs disallowed by the source's robots.txt
    #[serde(rename = "respect-robots-txt", default = "default_true")]
    pub respect_robots_txt: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
            max_redirects: default_max_redirects(),
            respect_robots_txt: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the identity sent with every request
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one structured content document per page
    #[serde(rename = "content-dir", default = "default_content_dir")]
    pub content_dir: String,

    /// Directory receiving navigation.json
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,

    /// Directory receiving the four audit reports
    #[serde(rename = "reports-dir", default = "default_reports_dir")]
    pub reports_dir: String,

    /// Public asset root for downloaded images
    #[serde(rename = "public-dir", default = "default_public_dir")]
    pub public_dir: String,

    /// Extension of structured content documents
    #[serde(rename = "document-extension", default = "default_document_extension")]
    pub document_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            data_dir: default_data_dir(),
            reports_dir: default_reports_dir(),
            public_dir: default_public_dir(),
            document_extension: default_document_extension(),
        }
    }
}

/// URL admission rules
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Regular expressions matched against URL paths; a match rejects the URL
    #[serde(rename = "exclude-patterns", default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Asset placement conventions
#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    /// Path segment whose suffix is preserved when downloading images
    #[serde(rename = "uploads-segment", default = "default_uploads_segment")]
    pub uploads_segment: String,

    /// Directory under the public root for flattened images
    #[serde(rename = "images-dir", default = "default_images_dir")]
    pub images_dir: String,

    /// Logo path used when the homepage has no recognizable logo
    #[serde(rename = "default-logo", default = "default_logo")]
    pub default_logo: String,

    /// Open Graph image used in document headers when a page has none
    #[serde(rename = "default-og-image", default = "default_og_image")]
    pub default_og_image: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            uploads_segment: default_uploads_segment(),
            images_dir: default_images_dir(),
            default_logo: default_logo(),
            default_og_image: default_og_image(),
        }
    }
}

fn default_sitemap_path() -> String {
    "/sitemap_index.xml".to_string()
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_retry_delay_ms() -> u64 {
    2000
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_download_timeout_secs() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_content_dir() -> String {
    "content/pages".to_string()
}

fn default_data_dir() -> String {
    "content/data".to_string()
}

fn default_reports_dir() -> String {
    "reports".to_string()
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_document_extension() -> String {
    "mdx".to_string()
}

/// Administrative, feed/API, non-document and pagination paths
pub fn default_exclude_patterns() -> Vec<String> {
    [
        r"/wp-admin/",
        r"/wp-content/",
        r"/wp-includes/",
        r"/feed/",
        r"/wp-json/",
        r"(?i)\.(xml|json|css|js|jpg|jpeg|png|gif|svg|pdf)$",
        r"/page/\d+/?$",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

fn default_uploads_segment() -> String {
    "/wp-content/uploads/".to_string()
}

fn default_images_dir() -> String {
    "images".to_string()
}

fn default_logo() -> String {
    "/images/logo.png".to_string()
}

fn default_og_image() -> String {
    "/images/og-image.jpg".to_string()
}
