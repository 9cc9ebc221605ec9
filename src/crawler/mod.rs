//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a bounded timeout
//! - Link extraction from page content
//! - Breadth-first frontier bookkeeping
//! - Simple and graph crawl orchestration

mod engine;
mod fetcher;
mod frontier;
mod parser;

pub use engine::{CrawlMode, Crawler, DEFAULT_MAX_DEPTH};
pub use fetcher::{build_http_client, fetch_url, Fetch, FetchOutcome, HttpFetcher};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::extract_links;
