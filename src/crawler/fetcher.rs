//! HTTP fetcher implementation
//!
//! A fetch is a single GET with a bounded timeout that follows redirects.
//! Non-2xx statuses are ordinary outcomes; transport failures (DNS, refused
//! connection, timeout) are reported as values, never as errors.

use crate::config::CrawlerConfig;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered, whatever the status
    Response {
        /// HTTP status code of the final response after redirects
        status: u16,
        /// Page body content
        body: String,
    },

    /// No usable response (connection refused, timeout, etc.)
    TransportError {
        /// Error description
        error: String,
    },
}

/// Source of page contents for the crawler
pub trait Fetch {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// [`Fetch`] implementation backed by a shared reqwest client
///
/// The client's connection pool may be shared across crawls; the fetcher
/// itself holds no per-crawl state.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher from the crawler configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use link_atlas::config::CrawlerConfig;
    /// use link_atlas::crawler::HttpFetcher;
    ///
    /// let fetcher = HttpFetcher::new(&CrawlerConfig::default()).unwrap();
    /// ```
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        build_http_client(config).map(Self::with_client)
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, following redirects
///
/// # Outcome Classification
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Any HTTP status | Response with status and body |
/// | Timeout | TransportError "Request timeout" |
/// | Connection refused / DNS | TransportError "Connection failed" |
/// | Redirect chain too long | TransportError "Too many redirects" |
/// | Body read failure | TransportError |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return transport_error(url, &e),
    };

    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => FetchOutcome::Response { status, body },
        Err(e) => transport_error(url, &e),
    }
}

fn transport_error(url: &str, e: &reqwest::Error) -> FetchOutcome {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    };

    tracing::debug!("Transport failure for {}: {}", url, error);
    FetchOutcome::TransportError { error }
}
