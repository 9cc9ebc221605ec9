//! Link-Atlas: a single-origin site mapper
//!
//! This crate crawls a website from a seed URL. In simple mode it returns the
//! raw links found on that one page; in graph mode it walks same-origin pages
//! breadth-first up to a bounded depth, records the directed link structure,
//! and can export it as a GraphML document. Progress is reported as an ordered
//! stream of events through a caller-supplied sink.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod progress;
pub mod url;

use thiserror::Error;

/// Main error type for Link-Atlas operations
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL '{seed}': {source}")]
    InvalidSeed { seed: String, source: UrlError },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Link-Atlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, FetchOutcome, HttpFetcher};
pub use graph::{CrawlResult, SiteGraph};
pub use output::to_graphml;
pub use progress::{ProgressEvent, ProgressSink};
pub use crate::url::{normalize, Origin, PageUrl};
