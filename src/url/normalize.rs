use super::{Origin, PageUrl};
use url::Url;

/// Resolves a raw link against the page it was found on and scopes it to the
/// crawl origin
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base` (relative, absolute, scheme-relative and
///    fragment-only forms all follow standard URL resolution)
/// 2. Reject anything that is not http(s) or whose host and port differ from
///    the origin
/// 3. Drop the query string and fragment
/// 4. Strip trailing slashes from the path
///
/// # Returns
///
/// * `Some(PageUrl)` - The canonical in-scope URL
/// * `None` - The link is out of scope or cannot be resolved
///
/// # Examples
///
/// ```
/// use link_atlas::url::{normalize, parse_seed, Origin};
///
/// let base = parse_seed("http://a.test/docs/").unwrap();
/// let origin = Origin::of(&base).unwrap();
///
/// let url = normalize(&origin, &base, "intro/?page=2#top").unwrap();
/// assert_eq!(url.as_str(), "http://a.test/docs/intro");
///
/// assert!(normalize(&origin, &base, "http://other.test/").is_none());
/// ```
pub fn normalize(origin: &Origin, base: &Url, raw: &str) -> Option<PageUrl> {
    let resolved = base.join(raw).ok()?;

    if !origin.contains(&resolved) {
        return None;
    }

    Some(canonical_form(&resolved))
}

/// Builds the canonical `scheme://host[:port]/path` key for an absolute URL
///
/// Query and fragment are dropped. All trailing slashes are removed, so the
/// site root `http://a.test/` becomes `http://a.test`; removing every trailing
/// slash (not just one) keeps the form a fixed point under re-normalization.
pub fn canonical_form(url: &Url) -> PageUrl {
    let mut canonical = String::with_capacity(url.as_str().len());
    canonical.push_str(url.scheme());
    canonical.push_str("://");
    canonical.push_str(url.host_str().unwrap_or_default());
    if let Some(port) = url.port() {
        canonical.push(':');
        canonical.push_str(&port.to_string());
    }
    canonical.push_str(url.path().trim_end_matches('/'));

    PageUrl::from_canonical(canonical)
}
