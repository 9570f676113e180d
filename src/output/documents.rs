//! Content document generation
//!
//! Each extracted page becomes one markdown document with a frontmatter
//! header that the rendering layer reads.

use crate::config::Config;
use crate::output::write_file;
use crate::state::{PageMap, PageRecord};
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

const DEFAULT_TWITTER_CARD: &str = "summary_large_image";

/// Maps a URL path to a document path relative to the content directory
///
/// # Mapping Rules
///
/// | URL path            | Document path                |
/// |---------------------|------------------------------|
/// | `/`                 | `index.<ext>`                |
/// | `/services/`        | `services/index.<ext>`       |
/// | `/about`            | `about.<ext>`                |
///
/// Paths with `.` or `..` segments yield None.
pub fn document_path(url_path: &str, extension: &str) -> Option<PathBuf> {
    let trimmed = url_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Some(PathBuf::from(format!("index.{}", extension)));
    }

    let directory_style = trimmed.ends_with('/');
    let segments: Vec<&str> = trimmed.trim_end_matches('/').split('/').collect();
    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == "..")
    {
        return None;
    }

    let mut path: PathBuf = segments.iter().collect();
    if directory_style {
        path.push(format!("index.{}", extension));
    } else {
        let name = format!("{}.{}", segments[segments.len() - 1], extension);
        path.set_file_name(name);
    }
    Some(path)
}

/// Layout hint for the rendering layer, inferred from the URL path
pub fn infer_layout(url_path: &str) -> &'static str {
    if url_path.is_empty() || url_path == "/" {
        "homepage"
    } else if url_path.contains("/services/") {
        "service"
    } else if url_path.contains("/customers/") {
        "customer"
    } else if url_path.contains("/about") {
        "about"
    } else if url_path.contains("/contact") {
        "contact"
    } else if url_path.contains("/news/") || url_path.contains("/blog/") {
        "post"
    } else {
        "default"
    }
}

/// Renders the frontmatter header followed by the markdown body
pub fn render_document(page: &PageRecord, url_path: &str, default_og_image: &str) -> String {
    let seo = &page.seo;
    let mut doc = String::from("---\n");

    doc.push_str(&format!("title: {}\n", quote(&page.title)));
    doc.push_str(&format!("description: {}\n", quote(&page.description)));
    doc.push_str(&format!("url: {}\n", quote(url_path)));
    doc.push_str("seo:\n");
    doc.push_str(&format!(
        "  ogTitle: {}\n",
        quote(seo.og_title.as_deref().unwrap_or(&page.title))
    ));
    doc.push_str(&format!(
        "  ogDescription: {}\n",
        quote(seo.og_description.as_deref().unwrap_or(&page.description))
    ));
    doc.push_str(&format!(
        "  ogImage: {}\n",
        quote(seo.og_image.as_deref().unwrap_or(default_og_image))
    ));
    doc.push_str(&format!(
        "  twitterCard: {}\n",
        quote(seo.twitter_card.as_deref().unwrap_or(DEFAULT_TWITTER_CARD))
    ));
    if let Some(canonical) = &seo.canonical {
        doc.push_str(&format!("  canonical: {}\n", quote(canonical)));
    }
    doc.push_str(&format!("layout: {}\n", quote(infer_layout(url_path))));
    doc.push_str("---\n\n");

    doc.push_str(&page.markdown);
    if !page.markdown.is_empty() {
        doc.push('\n');
    }
    doc
}

/// Writes one document per page under the content directory
///
/// Returns the number of documents written. A page whose path cannot be
/// mapped is skipped with a warning; a failed write aborts.
pub fn write_documents(pages: &PageMap, config: &Config) -> Result<usize> {
    let content_dir = Path::new(&config.output.content_dir);
    let mut written = 0;

    for page in pages.iter() {
        let url_path = page_path(&page.url);
        let Some(relative) = document_path(&url_path, &config.output.document_extension) else {
            warn!("Cannot map {} to a document path, skipping", page.url);
            continue;
        };

        let dest = content_dir.join(&relative);
        let body = render_document(page, &url_path, &config.assets.default_og_image);
        write_file(&dest, body.as_bytes())?;
        debug!("Wrote {}", dest.display());
        written += 1;
    }

    Ok(written)
}

/// Path component of a page URL, `/` if it cannot be parsed
pub fn page_path(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| "/".to_string())
}

fn quote(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ");
    format!("\"{}\"", escaped)
}
