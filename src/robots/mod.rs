//! Robots.txt handling module
//!
//! robots.txt is fetched once per run. A missing or unreadable file allows
//! everything.

mod parser;

pub use parser::RobotsRules;

use crate::crawler::{FetchResult, Fetcher};
use tracing::{debug, info};
use url::Url;

/// Fetches and parses `<base>/robots.txt` with a single attempt
pub async fn fetch_robots(fetcher: &Fetcher, base: &Url, agent: &str) -> RobotsRules {
    let robots_url = match base.join("/robots.txt") {
        Ok(url) => url,
        Err(_) => return RobotsRules::allow_all(agent),
    };

    match fetcher.fetch_once(robots_url.as_str()).await {
        FetchResult::Success { body, .. } => {
            info!("Loaded robots.txt from {}", robots_url);
            RobotsRules::from_content(&body, agent)
        }
        FetchResult::Failed { error, .. } => {
            debug!("No robots.txt at {} ({}), allowing all", robots_url, error);
            RobotsRules::allow_all(agent)
        }
    }
}
