//! Typed document query capability
//!
//! Every extractor reads HTML through [`Document`] and [`Element`], which
//! expose select-all, attribute, text and remove operations. The underlying
//! parser (`scraper`) stays an implementation detail of this module.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full HTML document; malformed markup is repaired, never rejected
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Returns every element matching the CSS selector, in document order
    ///
    /// An invalid selector matches nothing.
    pub fn select(&self, selector: &str) -> Vec<Element<'_>> {
        match parse_selector(selector) {
            Some(sel) => self.attached(&sel).map(Element).collect(),
            None => Vec::new(),
        }
    }

    /// Returns the first element matching the selector
    pub fn first(&self, selector: &str) -> Option<Element<'_>> {
        let sel = parse_selector(selector)?;
        let found = self.attached(&sel).next().map(Element);
        found
    }

    /// Returns the first non-empty value of `attr` on elements matching `selector`
    pub fn attr(&self, selector: &str, attr: &str) -> Option<String> {
        self.select(selector)
            .into_iter()
            .filter_map(|el| el.attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Returns the normalized text of the first element matching `selector`
    pub fn text(&self, selector: &str) -> Option<String> {
        self.first(selector)
            .map(|el| el.text())
            .filter(|t| !t.is_empty())
    }

    /// Detaches every element matching the selector from the tree
    ///
    /// Returns the number of removed elements. Nested matches are counted
    /// once per match even if an ancestor was removed first.
    pub fn remove(&mut self, selector: &str) -> usize {
        let Some(sel) = parse_selector(selector) else {
            return 0;
        };

        let ids: Vec<_> = self.attached(&sel).map(|el| el.id()).collect();
        for id in &ids {
            if let Some(mut node) = self.html.tree.get_mut(*id) {
                node.detach();
            }
        }
        ids.len()
    }

    /// Matching elements still reachable from the document root
    ///
    /// `Html::select` walks the whole node arena, detached nodes included,
    /// so traversal starts from the root instead.
    fn attached<'s: 'q, 'q>(
        &'s self,
        sel: &'q Selector,
    ) -> impl Iterator<Item = ElementRef<'s>> + 'q {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(move |el| sel.matches(el))
    }
}

/// A borrowed element of a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Element<'a>(ElementRef<'a>);

impl<'a> Element<'a> {
    /// Lowercase tag name
    pub fn tag(&self) -> &'a str {
        self.0.value().name()
    }

    /// Raw attribute value
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Returns true if the attribute is present, even without a value
    pub fn has_attr(&self, name: &str) -> bool {
        self.0.value().attr(name).is_some()
    }

    /// Returns true if the class list contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.0.value().classes().any(|c| c == class)
    }

    /// Descendant text with whitespace runs collapsed and ends trimmed
    pub fn text(&self) -> String {
        collapse_whitespace(&self.raw_text())
    }

    /// Descendant text exactly as it appears in the source
    pub fn raw_text(&self) -> String {
        self.0.text().collect()
    }

    /// Serialized HTML of the element's children
    pub fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    /// Descendants matching the selector, in document order
    pub fn select(&self, selector: &str) -> Vec<Element<'a>> {
        match parse_selector(selector) {
            Some(sel) => self.0.select(&sel).map(Element).collect(),
            None => Vec::new(),
        }
    }

    /// First descendant matching the selector
    pub fn first(&self, selector: &str) -> Option<Element<'a>> {
        let sel = parse_selector(selector)?;
        self.0.select(&sel).next().map(Element)
    }

    /// Direct child elements
    pub fn children(&self) -> Vec<Element<'a>> {
        self.0
            .children()
            .filter_map(ElementRef::wrap)
            .map(Element)
            .collect()
    }

    /// Direct child elements with the given tag name
    pub fn children_named(&self, tag: &str) -> Vec<Element<'a>> {
        self.children()
            .into_iter()
            .filter(|c| c.tag() == tag)
            .collect()
    }

    /// Nearest ancestor with the given tag name
    pub fn closest(&self, tag: &str) -> Option<Element<'a>> {
        self.0
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|a| a.value().name() == tag)
            .map(Element)
    }

    /// Returns true if any ancestor has the given tag name
    pub fn has_ancestor(&self, tag: &str) -> bool {
        self.closest(tag).is_some()
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!("Invalid selector '{}': {:?}", selector, e);
            None
        }
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
