//! URL handling module for Sumi-Migrate
//!
//! This module turns raw hrefs into canonical same-site URLs, or rejects them.
//! Every URL that enters a discovered or visited set has passed through
//! [`UrlFilter`].

mod domain;
mod matcher;
mod normalize;

use crate::config::Config;
use crate::ConfigError;
use std::fmt;
use std::hash::{Hash, Hasher};

// Re-export main functions
pub use domain::{same_site, site_identity};
pub use matcher::ExclusionMatcher;
pub use normalize::{canonical_key, parse_absolute, resolve_href};

use url::Url;

/// An absolute, same-site, fragment-free URL
///
/// Holds the fetchable form as first seen (trailing slash preserved) and an
/// identity key in which trailing slashes are ignored. Equality and hashing
/// use the key only.
#[derive(Debug, Clone)]
pub struct CanonicalUrl {
    url: Url,
    key: String,
}

impl CanonicalUrl {
    fn new(url: Url) -> Self {
        let key = canonical_key(&url);
        Self { url, key }
    }

    /// The URL to fetch
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The identity key used for deduplication
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The fetchable URL as a string
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The URL path, with its trailing slash if the source used one
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl PartialEq for CanonicalUrl {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CanonicalUrl {}

impl Hash for CanonicalUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Why a candidate URL was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Empty, anchor-only, mailto/tel/javascript/data, or unparsable
    NotNavigable,
    /// Host or port differs from the base URL
    OffSite,
    /// Path matched an exclusion pattern
    Excluded,
}

/// Canonicalizes raw hrefs into same-site URLs and applies exclusion rules
///
/// This is a pure value: building it compiles the patterns once, and every
/// check afterwards is side-effect free.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    base: Url,
    exclusions: ExclusionMatcher,
}

impl UrlFilter {
    /// Creates a filter for the given base URL and exclusion patterns
    pub fn new<S: AsRef<str>>(base: Url, exclude_patterns: &[S]) -> Result<Self, ConfigError> {
        let exclusions = ExclusionMatcher::new(exclude_patterns)
            .map_err(|e| ConfigError::InvalidPattern(e.to_string()))?;
        if exclusions.is_empty() {
            tracing::debug!("No exclusion patterns for {}", base);
        } else {
            tracing::debug!("{} exclusion patterns for {}", exclusions.len(), base);
        }
        Ok(Self { base, exclusions })
    }

    /// Builds the filter described by the configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let base = parse_absolute(&config.site.base_url)
            .map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        Self::new(base, &config.filter.exclude_patterns)
    }

    /// The site's homepage
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The homepage as a canonical URL
    pub fn homepage(&self) -> CanonicalUrl {
        CanonicalUrl::new(self.base.clone())
    }

    /// Resolves `href` found on `page_url`, returning None if it is rejected
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use sumi_migrate::url::UrlFilter;
    ///
    /// let base = Url::parse("https://example.com/").unwrap();
    /// let filter = UrlFilter::new(base.clone(), &["/wp-admin/"]).unwrap();
    ///
    /// let url = filter.admit("/about/#team", &base).unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/about/");
    ///
    /// assert!(filter.admit("https://other.com/", &base).is_none());
    /// assert!(filter.admit("/wp-admin/", &base).is_none());
    /// ```
    pub fn admit(&self, href: &str, page_url: &Url) -> Option<CanonicalUrl> {
        self.check(href, page_url).ok()
    }

    /// Like [`UrlFilter::admit`], but explains rejections
    pub fn check(&self, href: &str, page_url: &Url) -> Result<CanonicalUrl, Rejection> {
        let url = resolve_href(href, page_url).ok_or(Rejection::NotNavigable)?;
        self.check_absolute(url)
    }

    /// Applies domain and exclusion checks to an already absolute URL
    pub fn check_absolute(&self, mut url: Url) -> Result<CanonicalUrl, Rejection> {
        url.set_fragment(None);

        if !same_site(&self.base, &url) {
            return Err(Rejection::OffSite);
        }

        if self.exclusions.is_excluded(url.path()) {
            return Err(Rejection::Excluded);
        }

        Ok(CanonicalUrl::new(url))
    }

    /// Admits a sitemap `<loc>` value, resolving it against the base URL
    pub fn admit_loc(&self, loc: &str) -> Option<CanonicalUrl> {
        let base = self.base.clone();
        self.admit(loc, &base)
    }
}
