use serde::Serialize;
use std::fmt;

/// Status code carried by [`ProgressEvent::Error`]
pub const ERROR_CODE: u64 = 500;

/// A crawl lifecycle event
///
/// Events are built at the emission site with structured fields; consumers
/// match on the variant instead of inspecting message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A page was dequeued and is about to be fetched
    PageStarted { url: String, depth: u32 },

    /// A fetch completed with an HTTP status
    PageResult { url: String, status: u16 },

    /// A graph-mode page yielded this many same-origin links
    LinksFound { url: String, count: usize },

    /// A fetch failed at the transport level
    Error { url: String, message: String },

    /// A simple-mode page yielded this many raw links
    SimpleLinksFound { url: String, count: usize },

    /// The crawl finished; count is links (simple) or pages (graph)
    Completed { count: usize },
}

/// The discriminant of a [`ProgressEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PageStarted,
    PageResult,
    LinksFound,
    Error,
    SimpleLinksFound,
    Completed,
}

impl ProgressEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PageStarted { .. } => EventKind::PageStarted,
            Self::PageResult { .. } => EventKind::PageResult,
            Self::LinksFound { .. } => EventKind::LinksFound,
            Self::Error { .. } => EventKind::Error,
            Self::SimpleLinksFound { .. } => EventKind::SimpleLinksFound,
            Self::Completed { .. } => EventKind::Completed,
        }
    }

    /// The integer payload, whose meaning depends on the kind
    ///
    /// | Kind | Count |
    /// |------|-------|
    /// | PageStarted | depth |
    /// | PageResult | HTTP status |
    /// | LinksFound / SimpleLinksFound | links found |
    /// | Error | always 500 |
    /// | Completed | links or pages in the result |
    pub fn count(&self) -> u64 {
        match self {
            Self::PageStarted { depth, .. } => u64::from(*depth),
            Self::PageResult { status, .. } => u64::from(*status),
            Self::LinksFound { count, .. } | Self::SimpleLinksFound { count, .. } => *count as u64,
            Self::Error { .. } => ERROR_CODE,
            Self::Completed { count } => *count as u64,
        }
    }

    /// Human-readable description of the event
    pub fn message(&self) -> String {
        match self {
            Self::PageStarted { url, depth } => format!("Processing {} (depth {})", url, depth),
            Self::PageResult { url, status } => format!("Result {}: HTTP {}", url, status),
            Self::LinksFound { url, count } | Self::SimpleLinksFound { url, count } => {
                format!("Found {} links on {}", count, url)
            }
            Self::Error { url, message } => format!("Error on {}: {}", url, message),
            Self::Completed { count } => format!("Crawl completed ({})", count),
        }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
