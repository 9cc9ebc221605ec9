//! Crawler engine - simple and graph crawl orchestration
//!
//! The engine drives the fetcher, link extractor and normalizer one page at a
//! time. Each page produces a contiguous group of progress events
//! (`PageStarted`, then `PageResult`, then `LinksFound` or `Error`) and the
//! crawl closes with a single `Completed`.
//!
//! Only an unusable seed URL fails a crawl. Per-page problems become data: a
//! page that cannot be fetched or returns a non-200 status is recorded with
//! no outbound links.

use super::fetcher::{Fetch, FetchOutcome, HttpFetcher};
use super::frontier::Frontier;
use super::parser::extract_links;
use crate::config::{validate_crawler_config, CrawlerConfig};
use crate::graph::{CrawlResult, SiteGraph};
use crate::progress::{Delivery, ProgressEvent, ProgressSink};
use crate::url::{canonical_form, normalize, parse_seed, Origin, PageUrl};
use crate::AtlasError;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Default depth bound for graph crawls
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Which kind of crawl to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    /// Raw links of the seed page only
    Simple,
    /// Breadth-first same-origin graph up to `max_depth`
    Graph { max_depth: u32 },
}

/// Crawler over a [`Fetch`] implementation
///
/// A crawler holds no per-crawl state: every call owns its own frontier,
/// visited set and graph, so one crawler can serve many crawls.
#[derive(Debug, Clone)]
pub struct Crawler<F = HttpFetcher> {
    fetcher: F,
    max_pages: Option<usize>,
    cancel: Option<CancellationToken>,
}

impl Crawler<HttpFetcher> {
    /// Builds an HTTP crawler from the crawler configuration
    ///
    /// # Errors
    ///
    /// * `AtlasError::Config` - the configuration is out of range
    /// * `AtlasError::Client` - the HTTP client cannot be built
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, AtlasError> {
        validate_crawler_config(config)?;
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::new(fetcher).with_max_pages(config.max_pages))
    }
}

impl<F: Fetch> Crawler<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            max_pages: None,
            cancel: None,
        }
    }

    /// Caps how many pages a graph crawl fetches
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Stops crawls early once `token` is cancelled
    ///
    /// The token is checked before each dequeue and raced against each fetch.
    /// A cancelled crawl returns what it has built so far.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Runs a crawl in the given mode
    pub async fn crawl<S: ProgressSink>(
        &self,
        seed: &str,
        mode: CrawlMode,
        sink: &S,
    ) -> Result<CrawlResult, AtlasError> {
        match mode {
            CrawlMode::Simple => self.crawl_simple(seed, sink).await.map(CrawlResult::LinkList),
            CrawlMode::Graph { max_depth } => self
                .crawl_graph(seed, max_depth, sink)
                .await
                .map(CrawlResult::SiteGraph),
        }
    }

    /// Returns the raw `href` values of the seed page
    ///
    /// Links are returned verbatim: no resolution, no origin scoping. A
    /// non-200 status or a transport failure yields an empty list.
    ///
    /// # Errors
    ///
    /// * `AtlasError::InvalidSeed` - the seed is not an absolute http(s) URL
    pub async fn crawl_simple<S: ProgressSink>(
        &self,
        seed: &str,
        sink: &S,
    ) -> Result<Vec<String>, AtlasError> {
        let seed_url = parse_seed(seed).map_err(|source| AtlasError::InvalidSeed {
            seed: seed.to_string(),
            source,
        })?;
        let url = seed_url.as_str();

        tracing::info!("Starting simple crawl of {}", url);
        emit(
            sink,
            ProgressEvent::PageStarted {
                url: url.to_string(),
                depth: 0,
            },
        );

        let links = match self.fetch_unless_cancelled(url).await {
            None => Vec::new(),
            Some(FetchOutcome::TransportError { error }) => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                emit(
                    sink,
                    ProgressEvent::Error {
                        url: url.to_string(),
                        message: error,
                    },
                );
                Vec::new()
            }
            Some(FetchOutcome::Response { status, body }) => {
                emit(
                    sink,
                    ProgressEvent::PageResult {
                        url: url.to_string(),
                        status,
                    },
                );

                if status == 200 {
                    let links = extract_links(&body);
                    emit(
                        sink,
                        ProgressEvent::SimpleLinksFound {
                            url: url.to_string(),
                            count: links.len(),
                        },
                    );
                    links
                } else {
                    Vec::new()
                }
            }
        };

        tracing::info!("Simple crawl of {} found {} links", url, links.len());
        emit(sink, ProgressEvent::Completed { count: links.len() });
        Ok(links)
    }

    /// Crawls same-origin pages breadth-first up to `max_depth`
    ///
    /// # Algorithm
    ///
    /// 1. Capture the origin from the seed; the frontier holds `(seed, 0)`.
    ///    The seed is keyed canonically but fetched, and its links resolved,
    ///    at the URL as given
    /// 2. Dequeue entries, skipping visited ones and ones past `max_depth`
    /// 3. Fetch; a transport failure or non-200 status records the page with
    ///    no links
    /// 4. Otherwise normalize each extracted link against the page. Links
    ///    outside the origin are dropped; the rest become edges in discovery
    ///    order, and unvisited ones are enqueued at `depth + 1`
    ///
    /// Depth is only checked at dequeue time, so a link may appear as an edge
    /// target without ever becoming a key of the graph.
    ///
    /// # Errors
    ///
    /// * `AtlasError::InvalidSeed` - the seed has no usable origin
    pub async fn crawl_graph<S: ProgressSink>(
        &self,
        seed: &str,
        max_depth: u32,
        sink: &S,
    ) -> Result<SiteGraph, AtlasError> {
        let invalid_seed = |source| AtlasError::InvalidSeed {
            seed: seed.to_string(),
            source,
        };
        let seed_url = parse_seed(seed).map_err(invalid_seed)?;
        let origin = Origin::of(&seed_url).map_err(invalid_seed)?;
        let seed_page = canonical_form(&seed_url);

        tracing::info!(
            "Starting graph crawl of {} (max depth {})",
            seed_page,
            max_depth
        );

        let mut graph = SiteGraph::new();
        let mut frontier = Frontier::seeded(seed_page, seed_url);
        let mut fetched = 0usize;

        loop {
            if self.is_cancelled() {
                tracing::info!("Crawl cancelled with {} pages in frontier", frontier.len());
                break;
            }

            if self.max_pages.is_some_and(|max| fetched >= max) {
                tracing::info!("Page limit reached, discarding remaining frontier");
                frontier.clear();
                break;
            }

            let Some(entry) = frontier.next_unvisited(max_depth) else {
                break;
            };
            fetched += 1;

            let Some(location) = entry.location() else {
                tracing::warn!("Cannot request {}", entry.url);
                continue;
            };
            let url = entry.url;
            tracing::debug!("Processing {} at depth {}", url, entry.depth);
            emit(
                sink,
                ProgressEvent::PageStarted {
                    url: url.to_string(),
                    depth: entry.depth,
                },
            );

            let Some(outcome) = self.fetch_unless_cancelled(location.as_str()).await else {
                tracing::info!("Crawl cancelled while fetching {}", url);
                break;
            };

            let body = match outcome {
                FetchOutcome::TransportError { error } => {
                    tracing::warn!("Failed to fetch {}: {}", url, error);
                    emit(
                        sink,
                        ProgressEvent::Error {
                            url: url.to_string(),
                            message: error,
                        },
                    );
                    graph.insert(url, Vec::new());
                    continue;
                }
                FetchOutcome::Response { status, body } => {
                    emit(
                        sink,
                        ProgressEvent::PageResult {
                            url: url.to_string(),
                            status,
                        },
                    );
                    if status != 200 {
                        tracing::debug!("{} returned HTTP {}", url, status);
                        graph.insert(url, Vec::new());
                        continue;
                    }
                    body
                }
            };

            let links = scoped_links(&origin, &location, &body);
            for link in &links {
                if !frontier.is_visited(link) {
                    frontier.push(link.clone(), entry.depth + 1);
                }
            }

            emit(
                sink,
                ProgressEvent::LinksFound {
                    url: url.to_string(),
                    count: links.len(),
                },
            );
            graph.insert(url, links);
        }

        tracing::info!(
            "Graph crawl finished: {} pages, {} edges",
            graph.len(),
            graph.edge_count()
        );
        emit(sink, ProgressEvent::Completed { count: graph.len() });
        Ok(graph)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Fetches `url`, or returns `None` if the crawl is cancelled first
    async fn fetch_unless_cancelled(&self, url: &str) -> Option<FetchOutcome> {
        match &self.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => None,
                outcome = self.fetcher.fetch(url) => Some(outcome),
            },
            None => Some(self.fetcher.fetch(url).await),
        }
    }
}

/// Normalizes a page's links against the address it was fetched from,
/// keeping only those within the origin
fn scoped_links(origin: &Origin, page: &Url, body: &str) -> Vec<PageUrl> {
    extract_links(body)
        .iter()
        .filter_map(|raw| {
            let link = normalize(origin, page, raw);
            if link.is_none() {
                tracing::trace!("Dropping out-of-scope link {} on {}", raw, page);
            }
            link
        })
        .collect()
}

fn emit<S: ProgressSink>(sink: &S, event: ProgressEvent) {
    if sink.emit(event) == Delivery::Dropped {
        tracing::trace!("Progress event dropped by sink");
    }
}
