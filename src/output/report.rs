//! JSON crawl report
//!
//! The report is the stored form of a finished crawl: the link list or the
//! graph (with its GraphML rendering), a summary message and timestamps.

use crate::graph::{CrawlResult, SiteGraph};
use crate::output::{to_graphml, OutputResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Finished crawl, ready to be stored or published
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: String,
    pub mode: ReportMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub message: String,
    #[serde(flatten)]
    pub payload: ReportPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    Simple,
    Graph,
}

/// Mode-specific part of a report
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportPayload {
    Links { links: Vec<String> },
    Graph { graph: SiteGraph, graphml: String },
}

impl CrawlReport {
    /// Builds a report for a crawl that started at `started_at` and has just
    /// finished
    ///
    /// Fails only if the graph cannot be rendered as GraphML.
    pub fn new(seed: &str, result: CrawlResult, started_at: DateTime<Utc>) -> OutputResult<Self> {
        let (mode, message, payload) = match result {
            CrawlResult::LinkList(links) => (
                ReportMode::Simple,
                format!("Found {} links", links.len()),
                ReportPayload::Links { links },
            ),
            CrawlResult::SiteGraph(graph) => (
                ReportMode::Graph,
                format!("Built graph of {} pages", graph.len()),
                ReportPayload::Graph {
                    graphml: to_graphml(&graph)?,
                    graph,
                },
            ),
        };

        Ok(Self {
            seed: seed.to_string(),
            mode,
            started_at,
            finished_at: Utc::now(),
            message,
            payload,
        })
    }

    /// The GraphML document, for graph-mode reports
    pub fn graphml(&self) -> Option<&str> {
        match &self.payload {
            ReportPayload::Graph { graphml, .. } => Some(graphml),
            ReportPayload::Links { .. } => None,
        }
    }

    pub fn to_json_pretty(&self) -> OutputResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the report as pretty-printed JSON
    pub fn write(&self, output_path: &Path) -> OutputResult<()> {
        let json = self.to_json_pretty()?;

        let mut file = File::create(output_path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;

        Ok(())
    }
}
