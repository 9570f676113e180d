use crate::url::CanonicalUrl;
use std::collections::{HashSet, VecDeque};

/// Breadth-first crawl state
///
/// `discovered` only grows, `visited` is always a subset of `discovered`,
/// and every URL is marked visited at most once. The queue is FIFO.
#[derive(Debug, Default)]
pub struct CrawlState {
    discovered: HashSet<CanonicalUrl>,
    visited: HashSet<CanonicalUrl>,
    queue: VecDeque<CanonicalUrl>,
    order: Vec<CanonicalUrl>,
}

impl CrawlState {
    /// Creates a state seeded with a single URL
    pub fn seeded(seed: CanonicalUrl) -> Self {
        let mut state = Self::default();
        state.discover(seed);
        state
    }

    /// Records a URL as discovered and enqueues it
    ///
    /// Returns false if the URL (by canonical key) was already known.
    pub fn discover(&mut self, url: CanonicalUrl) -> bool {
        if self.discovered.contains(&url) {
            return false;
        }
        self.discovered.insert(url.clone());
        self.order.push(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Pops the next URL that has not been visited yet and marks it visited
    pub fn next_unvisited(&mut self) -> Option<CanonicalUrl> {
        while let Some(url) = self.queue.pop_front() {
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    #[cfg(test)]
    fn is_discovered(&self, url: &CanonicalUrl) -> bool {
        self.discovered.contains(url)
    }

    #[cfg(test)]
    fn is_visited(&self, url: &CanonicalUrl) -> bool {
        self.visited.contains(url)
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Consumes the state, returning discovered URLs in discovery order
    pub fn into_discovered(self) -> Vec<CanonicalUrl> {
        self.order
    }
}
