//! Header menu and footer extraction from the homepage

use crate::extract::document::{Document, Element};
use chrono::Datelike;
use serde::Serialize;
use url::Url;

/// Candidate nav containers, most specific first
const NAV_SELECTORS: &[&str] = &[
    "nav#site-navigation",
    "nav.main-navigation",
    ".primary-menu",
    "header nav",
    ".navbar",
];

const LOGO_SELECTOR: &str = "header img, .site-logo img, .custom-logo";
const FOOTER_BLOCKS: &str = "footer .widget, footer .footer-column, footer nav";
const FOOTER_TITLE: &str = ".widget-title, h3, h4, h5";
const COPYRIGHT_CANDIDATES: &str = "footer .copyright, footer .site-info, footer p";

/// Site navigation extracted once from the homepage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationTree {
    pub header: Header,
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub logo: String,
    pub menu: Vec<MenuItem>,
}

/// A menu entry; `items` holds at most one nested level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<MenuItem>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub copyright: String,
    pub sections: Vec<FooterSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterSection {
    pub title: String,
    pub links: Vec<FooterLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterLink {
    pub label: String,
    pub href: String,
}

/// Extracts the navigation tree from homepage HTML
///
/// `default_logo` is used when no logo image is found, and `site_name`
/// fills the generated copyright line when the footer has none.
pub fn extract_navigation(
    html: &str,
    base_url: &Url,
    site_name: &str,
    default_logo: &str,
) -> NavigationTree {
    let doc = Document::parse(html);

    let menu = NAV_SELECTORS
        .iter()
        .find_map(|selector| doc.first(selector))
        .map(extract_menu)
        .unwrap_or_default();

    let logo = extract_logo(&doc, base_url).unwrap_or_else(|| default_logo.to_string());

    let copyright = doc
        .select(COPYRIGHT_CANDIDATES)
        .into_iter()
        .map(|el| el.text())
        .find(|text| is_copyright(text))
        .unwrap_or_else(|| default_copyright(site_name));

    NavigationTree {
        header: Header { logo, menu },
        footer: Footer {
            copyright,
            sections: extract_footer_sections(&doc),
        },
    }
}

fn extract_menu(nav: Element<'_>) -> Vec<MenuItem> {
    let mut lists = nav.children_named("ul");
    for div in nav.children_named("div") {
        lists.extend(div.children_named("ul"));
    }

    lists
        .into_iter()
        .flat_map(|ul| ul.children_named("li"))
        .filter_map(|li| {
            let mut item = menu_entry(li)?;

            let submenus: Vec<_> = li
                .children()
                .into_iter()
                .filter(|c| c.tag() == "ul" || c.has_class("sub-menu") || c.has_class("dropdown-menu"))
                .collect();

            if !submenus.is_empty() {
                item.items = Some(
                    submenus
                        .into_iter()
                        .flat_map(|sub| sub.children_named("li"))
                        .filter_map(menu_entry)
                        .collect(),
                );
            }

            Some(item)
        })
        .collect()
}

/// Label and href from the first direct `<a>` child, without nesting
fn menu_entry(li: Element<'_>) -> Option<MenuItem> {
    let link = li.children_named("a").into_iter().next()?;
    let label = link.text();
    if label.is_empty() {
        return None;
    }

    Some(MenuItem {
        label,
        href: link.attr("href").map(str::trim).filter(|h| !h.is_empty()).map(normalize_href),
        items: None,
    })
}

fn extract_logo(doc: &Document, base_url: &Url) -> Option<String> {
    let src = doc.first(LOGO_SELECTOR)?.attr("src")?.trim();
    if src.is_empty() {
        return None;
    }
    base_url.join(src).ok().map(|u| u.to_string())
}

fn extract_footer_sections(doc: &Document) -> Vec<FooterSection> {
    doc.select(FOOTER_BLOCKS)
        .into_iter()
        .filter_map(|block| {
            let title = block.first(FOOTER_TITLE).map(|t| t.text()).filter(|t| !t.is_empty())?;

            let links: Vec<FooterLink> = block
                .select("a[href]")
                .into_iter()
                .filter_map(|a| {
                    let label = a.text();
                    let href = a.attr("href")?.trim();
                    if label.is_empty() || href.is_empty() || href.starts_with('#') {
                        return None;
                    }
                    Some(FooterLink {
                        label,
                        href: normalize_href(href),
                    })
                })
                .collect();

            if links.is_empty() {
                None
            } else {
                Some(FooterSection { title, links })
            }
        })
        .collect()
}

/// Keeps absolute URLs and root-relative paths, roots everything else
pub fn normalize_href(href: &str) -> String {
    if href.starts_with("http") || href.starts_with('/') {
        href.to_string()
    } else {
        format!("/{}", href)
    }
}

fn is_copyright(text: &str) -> bool {
    text.contains('©') || text.to_lowercase().contains("copyright")
}

fn default_copyright(site_name: &str) -> String {
    let year = chrono::Local::now().year();
    format!("© {} {}. All rights reserved.", year, site_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn extract(html: &str) -> NavigationTree {
        extract_navigation(html, &base(), "Example Co", "/images/logo.png")
    }

    #[test]
    fn test_single_item_with_dropdown() {
        let html = r#"
            <header>
            <nav id="site-navigation">
                <ul>
                    <li>
                        <a href="/services/">Services</a>
                        <ul class="sub-menu">
                            <li><a href="/services/a/">A</a></li>
                            <li><a href="services/b/">B</a></li>
                            <li><a href="https://example.com/services/c/">C</a></li>
                        </ul>
                    </li>
                </ul>
            </nav>
            </header>
        "#;
        let nav = extract(html);
        assert_eq!(nav.header.menu.len(), 1);

        let item = &nav.header.menu[0];
        assert_eq!(item.label, "Services");
        assert_eq!(item.href.as_deref(), Some("/services/"));

        let children = item.items.as_ref().unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(children[1].href.as_deref(), Some("/services/b/"));
        assert_eq!(
            children[2].href.as_deref(),
            Some("https://example.com/services/c/")
        );
        assert!(children.iter().all(|c| c.items.is_none()));
    }

    #[test]
    fn test_menu_is_one_level_deep() {
        let html = r#"
            <nav class="main-navigation"><div><ul>
                <li><a href="/a">A</a>
                    <ul><li><a href="/a/1">A1</a>
                        <ul><li><a href="/a/1/x">Deep</a></li></ul>
                    </li></ul>
                </li>
                <li><span>No link</span></li>
                <li><a href="/b">B</a></li>
            </ul></div></nav>
        "#;
        let nav = extract(html);
        let labels: Vec<_> = nav.header.menu.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);

        let a_items = nav.header.menu[0].items.as_ref().unwrap();
        assert_eq!(a_items.len(), 1);
        assert_eq!(a_items[0].label, "A1");
        assert!(a_items[0].items.is_none());
        assert!(nav.header.menu[1].items.is_none());
    }

    #[test]
    fn test_logo_resolution() {
        let html = r#"<header><img src="/wp-content/uploads/logo.svg"></header>"#;
        assert_eq!(
            extract(html).header.logo,
            "https://example.com/wp-content/uploads/logo.svg"
        );

        let none = "<header><p>No logo</p></header>";
        assert_eq!(extract(none).header.logo, "/images/logo.png");
    }

    #[test]
    fn test_footer_sections_and_copyright() {
        let html = r##"
            <footer>
                <div class="widget">
                    <h4 class="widget-title">Company</h4>
                    <ul>
                        <li><a href="/about">About</a></li>
                        <li><a href="#top">Back to top</a></li>
                        <li><a href="careers">Careers</a></li>
                    </ul>
                </div>
                <div class="widget"><ul><li><a href="/x">Untitled</a></li></ul></div>
                <div class="footer-column"><h3>Empty</h3><p>No links</p></div>
                <p>Built with care</p>
                <p class="site-info">Copyright 2019 Example Co</p>
            </footer>
        "##;
        let nav = extract(html);
        assert_eq!(nav.footer.sections.len(), 1);

        let section = &nav.footer.sections[0];
        assert_eq!(section.title, "Company");
        let hrefs: Vec<_> = section.links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/about", "/careers"]);

        assert_eq!(nav.footer.copyright, "Copyright 2019 Example Co");
    }

    #[test]
    fn test_default_copyright_uses_current_year() {
        let nav = extract("<footer><p>Hello</p></footer>");
        let year = chrono::Local::now().year();
        assert_eq!(
            nav.footer.copyright,
            format!("© {} Example Co. All rights reserved.", year)
        );
    }

    #[test]
    fn test_no_nav_yields_empty_menu() {
        let nav = extract("<body><p>Plain</p></body>");
        assert!(nav.header.menu.is_empty());
        assert!(nav.footer.sections.is_empty());
    }

    #[test]
    fn test_normalize_href() {
        assert_eq!(normalize_href("https://a.com/x"), "https://a.com/x");
        assert_eq!(normalize_href("/x"), "/x");
        assert_eq!(normalize_href("x/y"), "/x/y");
    }
}
