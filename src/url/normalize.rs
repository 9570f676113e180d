use crate::UrlError;
use url::Url;

/// Schemes and prefixes that never lead to a crawlable page
const SKIPPED_PREFIXES: &[&str] = &["#", "mailto:", "tel:", "javascript:", "data:"];

/// Resolves a raw href found on `page_url` into an absolute, fragment-free URL
///
/// # Resolution Steps
///
/// 1. Trim whitespace; reject empty hrefs
/// 2. Reject same-page anchors and `mailto:`, `tel:`, `javascript:`, `data:` links
/// 3. Resolve relative hrefs against the page URL
/// 4. Reject anything that is not HTTP(S) after resolution
/// 5. Strip the fragment
///
/// Domain and exclusion checks are left to [`super::UrlFilter`].
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_migrate::url::resolve_href;
///
/// let page = Url::parse("https://example.com/services/").unwrap();
/// let url = resolve_href("consulting#pricing", &page).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/services/consulting");
///
/// assert!(resolve_href("#top", &page).is_none());
/// assert!(resolve_href("mailto:hi@example.com", &page).is_none());
/// ```
pub fn resolve_href(href: &str, page_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        return None;
    }

    let mut url = page_url.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

/// Parses an absolute URL and strips its fragment
///
/// Used for URLs that arrive already absolute (sitemap entries, configuration).
pub fn parse_absolute(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Computes the identity key of a URL
///
/// Two URLs that differ only by fragment or by a trailing slash share a key.
/// The host is lowercased by the `url` crate already and loses any `www.`
/// prefix; the root path keeps its single slash.
pub fn canonical_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let mut key = String::with_capacity(url.as_str().len());
    key.push_str(url.scheme());
    key.push_str("://");
    key.push_str(host.strip_prefix("www.").unwrap_or(host));
    if let Some(port) = url.port() {
        key.push(':');
        key.push_str(&port.to_string());
    }

    let path = url.path();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        key.push('/');
    } else {
        key.push_str(trimmed);
    }

    if let Some(query) = url.query() {
        key.push('?');
        key.push_str(query);
    }

    key
}
