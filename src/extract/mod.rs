//! HTML extraction module for Sumi-Migrate
//!
//! Extractors are pure functions over page HTML. They read markup only
//! through [`document::Document`] and never perform I/O.

pub mod analytics;
pub mod content;
pub mod document;
pub mod forms;
pub mod markdown;
pub mod navigation;

pub use analytics::{detect_analytics, AnalyticsProvider, AnalyticsRecord, ScriptLocation};
pub use content::{extract_content, PageContent, SeoFields};
pub use document::{Document, Element};
pub use forms::{extract_forms, FieldRecord, FormRecord};
pub use markdown::MarkdownConverter;
pub use navigation::{
    extract_navigation, Footer, FooterLink, FooterSection, Header, MenuItem, NavigationTree,
};
