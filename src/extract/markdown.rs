//! HTML to markdown conversion

use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;

/// Immutably configured HTML → markdown converter
///
/// Constructed once by the coordinator and lent to every extraction call.
/// Output uses ATX headings and fenced code blocks, and is identical for
/// identical input.
pub struct MarkdownConverter {
    inner: HtmlToMarkdown,
}

impl MarkdownConverter {
    pub fn new() -> Self {
        let inner = HtmlToMarkdown::builder()
            .options(Options {
                heading_style: HeadingStyle::Atx,
                code_block_style: CodeBlockStyle::Fenced,
                ..Default::default()
            })
            .skip_tags(vec!["script", "style"])
            .build();
        Self { inner }
    }

    /// Converts an HTML fragment, trimming surrounding blank lines
    pub fn convert(&self, html: &str) -> std::io::Result<String> {
        let markdown = self.inner.convert(html)?;
        Ok(markdown.trim().to_string())
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}
