//! Sitemap parsing
//!
//! Handles both sitemap indexes (`<sitemapindex>`) and flat sitemaps
//! (`<urlset>`). Only a `<loc>` directly inside `<url>` or `<sitemap>` is
//! read, so extension entries such as `<image:loc>` never become page URLs.

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

/// Suffix shared by the sitemaps.org namespace URIs
const SITEMAP_NS_SUFFIX: &[u8] = b"/schemas/sitemap/0.9";

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sitemap {
    /// A sitemap index listing child sitemap URLs
    Index(Vec<String>),
    /// A flat sitemap listing page URLs
    UrlSet(Vec<String>),
    /// Not a sitemap, or malformed XML
    Invalid,
}

#[cfg(test)]
impl Sitemap {
    fn locs(&self) -> &[String] {
        match self {
            Sitemap::Index(locs) | Sitemap::UrlSet(locs) => locs,
            Sitemap::Invalid => &[],
        }
    }
}

/// Parses sitemap XML
///
/// Malformed XML or an unknown root element yields [`Sitemap::Invalid`]
/// rather than an error, since a bad sitemap only means falling back to
/// crawling.
pub fn parse_sitemap(xml: &str) -> Sitemap {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut root: Option<bool> = None; // Some(true) = index
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut in_loc = false;
    let mut current = String::new();
    let mut locs = Vec::new();

    loop {
        let (ns, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::debug!("Sitemap XML error: {}", e);
                return Sitemap::Invalid;
            }
        };
        let sitemap_ns = is_sitemap_namespace(&ns);

        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                match name.as_slice() {
                    b"sitemapindex" if root.is_none() => root = Some(true),
                    b"urlset" if root.is_none() => root = Some(false),
                    b"loc" if sitemap_ns && is_entry(open.last()) => {
                        in_loc = true;
                        current.clear();
                    }
                    _ => {}
                }
                open.push(name);
            }
            Event::End(_) => {
                let closed = open.pop();
                if in_loc && closed.as_deref() == Some(b"loc".as_slice()) {
                    in_loc = false;
                    let loc = current.trim();
                    if !loc.is_empty() {
                        locs.push(loc.to_string());
                    }
                }
            }
            Event::Text(t) if in_loc => match t.unescape() {
                Ok(text) => current.push_str(&text),
                Err(e) => {
                    tracing::debug!("Bad entity in sitemap <loc>: {}", e);
                    return Sitemap::Invalid;
                }
            },
            Event::CData(c) if in_loc => {
                current.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    match root {
        Some(true) => Sitemap::Index(locs),
        Some(false) => Sitemap::UrlSet(locs),
        None => Sitemap::Invalid,
    }
}

/// Unprefixed elements without a default namespace are accepted too
fn is_sitemap_namespace(ns: &ResolveResult<'_>) -> bool {
    match ns {
        ResolveResult::Unbound => true,
        ResolveResult::Bound(Namespace(uri)) => uri.ends_with(SITEMAP_NS_SUFFIX),
        ResolveResult::Unknown(_) => false,
    }
}

fn is_entry(parent: Option<&Vec<u8>>) -> bool {
    matches!(parent.map(Vec::as_slice), Some(b"url") | Some(b"sitemap"))
}
