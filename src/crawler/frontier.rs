//! Breadth-first frontier and visited-set bookkeeping
//!
//! The frontier is strict FIFO, so pages come out in non-decreasing depth
//! order and, within a depth, in discovery order. The visited set only grows.

use crate::url::PageUrl;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: PageUrl,
    pub depth: u32,
    /// Address to request when it differs from the canonical key (the seed)
    pub location: Option<Url>,
}

impl FrontierEntry {
    /// The address to request, which is also the base for resolving links
    pub fn location(&self) -> Option<Url> {
        match &self.location {
            Some(location) => Some(location.clone()),
            None => Url::parse(self.url.as_str()).ok(),
        }
    }
}

/// Frontier queue and visited set owned by one crawl
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<PageUrl>,
}

impl Frontier {
    /// Creates a frontier holding only the seed at depth 0
    ///
    /// The seed is keyed by its canonical form but requested at `location`,
    /// the URL as given, query and trailing slash included.
    pub fn seeded(seed: PageUrl, location: Url) -> Self {
        let mut frontier = Self::default();
        frontier.queue.push_back(FrontierEntry {
            url: seed,
            depth: 0,
            location: Some(location),
        });
        frontier
    }

    pub fn push(&mut self, url: PageUrl, depth: u32) {
        self.queue.push_back(FrontierEntry {
            url,
            depth,
            location: None,
        });
    }

    /// Dequeues the next entry that is unvisited and within `max_depth`
    ///
    /// Skipped entries are dropped without being marked visited. The
    /// returned entry is marked visited before it is handed out.
    pub fn next_unvisited(&mut self, max_depth: u32) -> Option<FrontierEntry> {
        while let Some(entry) = self.queue.pop_front() {
            if entry.depth > max_depth || self.visited.contains(&entry.url) {
                tracing::trace!("Skipping {} at depth {}", entry.url, entry.depth);
                continue;
            }
            self.visited.insert(entry.url.clone());
            return Some(entry);
        }
        None
    }

    pub fn is_visited(&self, url: &PageUrl) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of queued entries, including ones that will be skipped
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every queued entry
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
