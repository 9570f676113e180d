//! Page content and SEO metadata extraction

use crate::extract::document::Document;
use crate::extract::markdown::MarkdownConverter;
use serde::Serialize;
use url::Url;

/// Elements stripped before the main content region is located
const BOILERPLATE: &str = "header, footer, nav, script, style, .sidebar";

/// Main content candidates, most specific first
const MAIN_CONTENT_CHAIN: &[&str] = &["main", "article", ".content", "body"];

/// Search-engine and social metadata, each field independently optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
}

/// Structured content of one page, before forms and analytics are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub title: String,
    pub description: String,
    pub seo: SeoFields,
    pub raw_content_html: String,
    pub markdown: String,
    pub images: Vec<String>,
}

/// Extracts title, description, SEO fields, main content, markdown and images
///
/// # Extraction Rules
///
/// - title: `<title>` → `og:title` → `site_name`
/// - description: meta description → `og:description` → empty
/// - images: every `img[src]` of the whole page, resolved against `page_url`,
///   collected before boilerplate is removed
/// - main content: `main` → `article` → `.content` → `body`, after removing
///   header, footer, nav, script, style and `.sidebar`
pub fn extract_content(
    html: &str,
    page_url: &Url,
    site_name: &str,
    converter: &MarkdownConverter,
) -> std::io::Result<PageContent> {
    let mut doc = Document::parse(html);

    let seo = extract_seo(&doc);

    let title = doc
        .text("title")
        .or_else(|| seo.og_title.clone())
        .unwrap_or_else(|| site_name.to_string());

    let description = doc
        .attr("meta[name='description']", "content")
        .or_else(|| seo.og_description.clone())
        .unwrap_or_default();

    let images = extract_images(&doc, page_url);

    doc.remove(BOILERPLATE);
    let raw_content_html = main_content_html(&doc);
    let markdown = converter.convert(&raw_content_html)?;

    Ok(PageContent {
        title,
        description,
        seo,
        raw_content_html,
        markdown,
        images,
    })
}

/// Reads the Open Graph, Twitter and canonical tags
pub fn extract_seo(doc: &Document) -> SeoFields {
    SeoFields {
        og_title: doc.attr("meta[property='og:title']", "content"),
        og_description: doc.attr("meta[property='og:description']", "content"),
        og_image: doc.attr("meta[property='og:image']", "content"),
        twitter_card: doc.attr("meta[name='twitter:card']", "content"),
        canonical: doc.attr("link[rel='canonical']", "href"),
    }
}

/// Collects absolute image URLs in document order
pub fn extract_images(doc: &Document, page_url: &Url) -> Vec<String> {
    doc.select("img[src]")
        .into_iter()
        .filter_map(|img| img.attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty() && !src.starts_with("data:"))
        .filter_map(|src| page_url.join(src).ok())
        .map(|mut url| {
            url.set_fragment(None);
            url.to_string()
        })
        .collect()
}

fn main_content_html(doc: &Document) -> String {
    MAIN_CONTENT_CHAIN
        .iter()
        .filter_map(|selector| doc.first(selector))
        .map(|el| el.inner_html())
        .find(|html| !html.trim().is_empty())
        .unwrap_or_default()
}
