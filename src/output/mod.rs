//! Output module for exporting crawl results
//!
//! This module handles:
//! - Serializing site graphs as GraphML
//! - Building and writing JSON crawl reports

mod graphml;
mod report;

pub use graphml::{to_graphml, write_graphml};
pub use report::{CrawlReport, ReportMode, ReportPayload};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write XML: {0}")]
    Xml(#[from] xml::writer::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
