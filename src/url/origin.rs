use crate::{UrlError, UrlResult};
use url::Url;

/// The web authority a graph crawl is scoped to
///
/// Captured once from the seed URL. A link is in scope when it is an http(s)
/// URL whose host and port match; default ports are elided by the parser, so
/// `http://a.test` and `http://a.test:80` share an origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Captures the origin of a parsed seed URL
    pub fn of(url: &Url) -> UrlResult<Self> {
        let host = url.host_str().ok_or(UrlError::MissingHost)?;
        Ok(Self {
            scheme: url.scheme().to_string(),
            host: host.to_lowercase(),
            port: url.port(),
        })
    }

    /// Returns true if the URL is http(s) and shares this origin's host and
    /// port
    pub fn contains(&self, url: &Url) -> bool {
        if !is_web_scheme(url.scheme()) {
            return false;
        }
        match url.host_str() {
            Some(host) => host.eq_ignore_ascii_case(&self.host) && url.port() == self.port,
            None => false,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

/// Parses and validates a seed URL
///
/// The seed must be an absolute `http` or `https` URL with a host.
///
/// # Examples
///
/// ```
/// use link_atlas::url::parse_seed;
///
/// assert!(parse_seed("http://a.test/").is_ok());
/// assert!(parse_seed("ftp://a.test/").is_err());
/// assert!(parse_seed("not a url").is_err());
/// ```
pub fn parse_seed(seed: &str) -> UrlResult<Url> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_web_scheme(url.scheme()) {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

fn is_web_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}
