use serde::Deserialize;

/// Main configuration structure for Link-Atlas
///
/// Every section and key is optional; missing values take their defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub progress: ProgressConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the seed in graph mode
    pub max_depth: u32,

    /// Overall per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,

    /// Maximum number of pages fetched in one graph crawl
    pub max_pages: Option<usize>,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: crate::crawler::DEFAULT_MAX_DEPTH,
            request_timeout_secs: 5,
            connect_timeout_secs: 5,
            max_redirects: 10,
            max_pages: None,
            user_agent: format!("link-atlas/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Progress delivery configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProgressConfig {
    /// Capacity of the bounded progress channel; events beyond it are dropped
    pub channel_capacity: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}
