//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: BFS worklist plus the discovered and visited sets
//! - `PageMap`: insertion-ordered map of extracted pages
//! - `PageStatus`: outcome of a page as recorded in reports

mod crawl_state;
mod page_map;
mod page_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_map::{PageMap, PageRecord};
pub use page_state::PageStatus;
