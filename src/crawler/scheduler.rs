//! Politeness scheduler
//!
//! This module enforces the fixed delay between successive requests to the
//! source site. It is owned by the coordinator and awaited before every
//! fetch, including sitemap and asset requests.

use crate::config::CrawlerConfig;
use std::time::{Duration, Instant};
use tracing::debug;

/// Enforces a minimum interval between successive requests
///
/// The first request is never delayed. Each later request waits until
/// `delay` has elapsed since the previous one was released.
#[derive(Debug)]
pub struct Scheduler {
    delay: Duration,
    last_request: Option<Instant>,
    requests: u64,
}

impl Scheduler {
    /// Creates a scheduler with the configured request delay
    pub fn new(config: &CrawlerConfig) -> Self {
        Self::with_delay(Duration::from_millis(config.request_delay_ms))
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            last_request: None,
            requests: 0,
        }
    }

    /// Current inter-request delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Number of requests released so far
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Raises the delay to `minimum` if it is currently shorter
    ///
    /// Used for robots.txt `Crawl-delay`. The delay never decreases.
    pub fn raise_delay(&mut self, minimum: Duration) {
        if minimum > self.delay {
            debug!("Raising request delay from {:?} to {:?}", self.delay, minimum);
            self.delay = minimum;
        }
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < self.delay {
            Some(self.delay - elapsed)
        } else {
            None
        }
    }

    /// Waits until the next request is allowed, then records it
    pub async fn wait(&mut self) {
        if let Some(wait) = self.time_until_next(Instant::now()) {
            tokio::time::sleep(wait).await;
        }
        self.record_request(Instant::now());
    }

    fn record_request(&mut self, now: Instant) {
        self.requests += 1;
        self.last_request = Some(now);
    }
}
