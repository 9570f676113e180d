//! Link extraction for the breadth-first crawl
//!
//! Only `<a href>` values are collected here. Resolution, fragment stripping
//! and same-site filtering happen in [`crate::url::UrlFilter`].

use crate::extract::Document;

/// Returns the raw `href` of every `<a>` element, in document order
///
/// # Example
///
/// ```
/// use sumi_migrate::crawler::extract_links;
///
/// let html = r#"<html><body><a href="/page">Link</a><a>No href</a></body></html>"#;
/// assert_eq!(extract_links(html), vec!["/page".to_string()]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    Document::parse(html)
        .select("a[href]")
        .into_iter()
        .filter_map(|a| a.attr("href"))
        .map(|href| href.trim().to_string())
        .collect()
}
