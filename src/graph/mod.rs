//! Crawl result data model
//!
//! A graph crawl produces a [`SiteGraph`]: every crawled page mapped to its
//! same-origin outbound links in discovery order. A simple crawl produces the
//! raw link list of a single page. Both are wrapped in [`CrawlResult`].

use crate::url::PageUrl;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Directed link structure between same-origin pages
///
/// Keys iterate in the order pages were crawled, which keeps serialized
/// output byte-identical across runs with identical responses. A URL that
/// appears only as an edge target was discovered but never crawled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteGraph {
    pages: IndexMap<PageUrl, Vec<PageUrl>>,
}

impl SiteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a crawled page and its outbound links
    ///
    /// Re-recording a page replaces its links but keeps its original position.
    pub fn insert(&mut self, page: PageUrl, links: Vec<PageUrl>) {
        self.pages.insert(page, links);
    }

    /// Returns the outbound links of a crawled page
    ///
    /// `None` means the page was never crawled, which is not the same as a
    /// crawled page with no links.
    pub fn links(&self, page: &str) -> Option<&[PageUrl]> {
        self.pages.get(page).map(Vec::as_slice)
    }

    /// Returns true if the page was crawled
    pub fn contains(&self, page: &str) -> bool {
        self.pages.contains_key(page)
    }

    /// Iterates over crawled pages in crawl order
    pub fn pages(&self) -> impl Iterator<Item = &PageUrl> {
        self.pages.keys()
    }

    /// Iterates over `(page, links)` pairs in crawl order
    pub fn iter(&self) -> impl Iterator<Item = (&PageUrl, &[PageUrl])> {
        self.pages.iter().map(|(page, links)| (page, links.as_slice()))
    }

    /// Position of a page in crawl order
    pub fn index_of(&self, page: &str) -> Option<usize> {
        self.pages.get_index_of(page)
    }

    /// Number of crawled pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of recorded edges, duplicates included
    pub fn edge_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }
}

impl<'a> IntoIterator for &'a SiteGraph {
    type Item = (&'a PageUrl, &'a Vec<PageUrl>);
    type IntoIter = indexmap::map::Iter<'a, PageUrl, Vec<PageUrl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Terminal output of a crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlResult {
    /// Raw `href` values from the seed page, verbatim (simple mode)
    LinkList(Vec<String>),

    /// Same-origin link structure (graph mode)
    SiteGraph(SiteGraph),
}

impl CrawlResult {
    /// Number of links (simple mode) or crawled pages (graph mode)
    pub fn count(&self) -> usize {
        match self {
            Self::LinkList(links) => links.len(),
            Self::SiteGraph(graph) => graph.len(),
        }
    }
}
