//! Crawler module for page discovery and fetching
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic and asset downloads
//! - Sitemap parsing and link extraction
//! - Request scheduling and rate limiting
//! - Overall migration coordination

mod coordinator;
mod discovery;
mod fetcher;
mod parser;
mod scheduler;
mod sitemap;

pub use coordinator::{Coordinator, RunMode};
pub use discovery::{Discoverer, Discovery, DiscoverySource};
pub use fetcher::{build_http_client, temp_sibling, DownloadError, FetchResult, Fetcher};
pub use parser::extract_links;
pub use scheduler::Scheduler;
pub use sitemap::{parse_sitemap, Sitemap};
