//! URL discovery
//!
//! Discovery tries the sitemap first and falls back to a breadth-first crawl
//! from the homepage only when the sitemap yields no admissible URLs. The
//! two phases never merge.

use crate::crawler::parser::extract_links;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::sitemap::{parse_sitemap, Sitemap};
use crate::crawler::{FetchResult, Fetcher};
use crate::robots::RobotsRules;
use crate::state::CrawlState;
use crate::url::{CanonicalUrl, UrlFilter};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

/// Where the discovered URL set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoverySource {
    Sitemap,
    Crawl,
}

/// Result of the discovery phase
#[derive(Debug)]
pub struct Discovery {
    /// Distinct canonical URLs, in sitemap or BFS discovery order
    pub urls: Vec<CanonicalUrl>,
    pub source: DiscoverySource,
}

/// Runs sitemap discovery with a BFS fallback
///
/// Borrows the coordinator's fetcher and scheduler so that every request,
/// including child sitemaps, goes through the same politeness delay.
pub struct Discoverer<'a> {
    fetcher: &'a Fetcher,
    scheduler: &'a mut Scheduler,
    filter: &'a UrlFilter,
    robots: &'a RobotsRules,
}

impl<'a> Discoverer<'a> {
    pub fn new(
        fetcher: &'a Fetcher,
        scheduler: &'a mut Scheduler,
        filter: &'a UrlFilter,
        robots: &'a RobotsRules,
    ) -> Self {
        Self {
            fetcher,
            scheduler,
            filter,
            robots,
        }
    }

    /// Discovers every page of the site
    pub async fn discover(&mut self, sitemap_url: &Url) -> Discovery {
        let urls = self.from_sitemap(sitemap_url).await;
        if !urls.is_empty() {
            info!("Discovered {} URLs from sitemap", urls.len());
            return Discovery {
                urls,
                source: DiscoverySource::Sitemap,
            };
        }

        info!("Sitemap yielded no URLs, falling back to crawling");
        let urls = self.crawl().await;
        info!("Discovered {} URLs by crawling", urls.len());
        Discovery {
            urls,
            source: DiscoverySource::Crawl,
        }
    }

    /// Reads the sitemap (or sitemap index) at `sitemap_url`
    ///
    /// Returns admitted, deduplicated URLs in document order. A missing or
    /// malformed sitemap yields an empty list. A child sitemap that fails is
    /// skipped.
    pub async fn from_sitemap(&mut self, sitemap_url: &Url) -> Vec<CanonicalUrl> {
        let Some(body) = self.fetch_optional(sitemap_url.as_str()).await else {
            info!("No sitemap at {}", sitemap_url);
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        match parse_sitemap(&body) {
            Sitemap::Index(children) => {
                info!("Found sitemap index with {} child sitemaps", children.len());
                for child in children {
                    let Some(child_body) = self.fetch_optional(&child).await else {
                        warn!("Skipping child sitemap {}: fetch failed", child);
                        continue;
                    };
                    match parse_sitemap(&child_body) {
                        Sitemap::UrlSet(locs) => {
                            debug!("Child sitemap {} lists {} URLs", child, locs.len());
                            self.admit_all(&locs, &mut seen, &mut urls);
                        }
                        Sitemap::Index(_) => {
                            warn!("Skipping nested sitemap index {}", child);
                        }
                        Sitemap::Invalid => {
                            warn!("Skipping child sitemap {}: not a valid sitemap", child);
                        }
                    }
                }
            }
            Sitemap::UrlSet(locs) => self.admit_all(&locs, &mut seen, &mut urls),
            Sitemap::Invalid => {
                info!("{} is not a valid sitemap", sitemap_url);
            }
        }

        urls
    }

    /// Breadth-first crawl from the homepage
    ///
    /// Each URL is fetched at most once. Pages that fail to fetch contribute
    /// no links.
    pub async fn crawl(&mut self) -> Vec<CanonicalUrl> {
        let mut state = CrawlState::seeded(self.filter.homepage());

        while let Some(url) = state.next_unvisited() {
            self.scheduler.wait().await;
            info!("Crawling {} ({} queued)", url, state.queue_len());

            let (page_url, body) = match self.fetcher.fetch(url.as_str()).await {
                FetchResult::Success {
                    final_url, body, ..
                } => {
                    let page_url = Url::parse(&final_url).unwrap_or_else(|_| url.url().clone());
                    (page_url, body)
                }
                FetchResult::Failed { attempts, error } => {
                    warn!(
                        "Failed to crawl {} after {} attempts: {}",
                        url, attempts, error
                    );
                    continue;
                }
            };

            for href in extract_links(&body) {
                if let Some(link) = self.admit(&href, &page_url) {
                    if state.discover(link.clone()) {
                        debug!("Discovered {}", link);
                    }
                }
            }
        }

        debug!(
            "Crawl finished: {} visited, {} discovered",
            state.visited_count(),
            state.discovered_count()
        );
        state.into_discovered()
    }

    async fn fetch_optional(&mut self, url: &str) -> Option<String> {
        self.scheduler.wait().await;
        self.fetcher.fetch_once(url).await.into_body()
    }

    fn admit(&self, href: &str, page_url: &Url) -> Option<CanonicalUrl> {
        self.filter
            .admit(href, page_url)
            .filter(|url| self.robots_allows(url))
    }

    fn robots_allows(&self, url: &CanonicalUrl) -> bool {
        let allowed = self.robots.is_allowed(url.as_str());
        if !allowed {
            debug!("Disallowed by robots.txt: {}", url);
        }
        allowed
    }

    fn admit_all(
        &self,
        locs: &[String],
        seen: &mut HashSet<CanonicalUrl>,
        urls: &mut Vec<CanonicalUrl>,
    ) {
        for loc in locs {
            if let Some(url) = self.filter.admit_loc(loc).filter(|url| self.robots_allows(url)) {
                if seen.insert(url.clone()) {
                    urls.push(url);
                }
            }
        }
    }
}
