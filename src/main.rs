//! Link-Atlas main entry point
//!
//! This is the command-line orchestrator: it runs one crawl, streams progress
//! envelopes to stdout as JSON lines and optionally writes the GraphML
//! document and the JSON report to files.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use link_atlas::config::{load_config, validate, Config};
use link_atlas::crawler::{CrawlMode, Crawler};
use link_atlas::output::{write_graphml, CrawlReport, ReportPayload};
use link_atlas::progress::{self, ObserverRegistry, ProgressRelay};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Observer id the CLI registers for its own stdout stream
const CLIENT_ID: &str = "cli";

/// The CLI runs a single crawl per invocation
const TASK_ID: u64 = 1;

/// Link-Atlas: a single-origin site mapper
///
/// Lists the links on a page, or with --graph maps the same-origin link
/// structure breadth-first and exports it as GraphML.
#[derive(Parser, Debug)]
#[command(name = "link-atlas")]
#[command(version)]
#[command(about = "A single-origin site mapper", long_about = None)]
struct Cli {
    /// Seed URL to crawl
    #[arg(value_name = "URL")]
    url: String,

    /// Build the same-origin site graph instead of listing raw links
    #[arg(long)]
    graph: bool,

    /// Maximum graph depth from the seed (overrides config)
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum pages fetched in graph mode (overrides config)
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Per-request timeout in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the GraphML document to this file
    #[arg(long, value_name = "PATH", requires = "graph")]
    graphml: Option<PathBuf>,

    /// Write the JSON crawl report to this file
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = effective_config(&cli)?;
    let mode = if cli.graph {
        CrawlMode::Graph {
            max_depth: config.crawler.max_depth,
        }
    } else {
        CrawlMode::Simple
    };

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_interrupt(cancel.clone()));

    let crawler = Crawler::from_config(&config.crawler)
        .context("Failed to build crawler")?
        .with_cancellation(cancel);

    // Registry lives for the whole run; the CLI is its only observer
    let registry = ObserverRegistry::new();
    let printer = tokio::spawn(print_messages(registry.register(CLIENT_ID)));

    let (sink, events) = progress::channel(config.progress.channel_capacity);
    let relay = ProgressRelay::new(registry.clone(), CLIENT_ID, TASK_ID);
    let relay_task = relay.clone().spawn(events);

    let started_at = Utc::now();
    let result = crawler.crawl(&cli.url, mode, &sink).await;

    // Closing the sink lets the relay drain and finish
    drop(sink);
    relay_task.await.context("Progress relay failed")?;

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            registry.unregister(CLIENT_ID);
            printer.await.context("Progress printer failed")?;
            return Err(e.into());
        }
    };

    let report =
        CrawlReport::new(&cli.url, result, started_at).context("Failed to build crawl report")?;
    relay.publish_result(&report);

    if let (Some(path), ReportPayload::Graph { graph, .. }) = (&cli.graphml, &report.payload) {
        write_graphml(graph, path)
            .with_context(|| format!("Failed to write GraphML to {}", path.display()))?;
        tracing::info!("GraphML written to {}", path.display());
    }

    if let Some(path) = &cli.report {
        report
            .write(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    registry.unregister(CLIENT_ID);
    printer.await.context("Progress printer failed")?;

    tracing::info!("{}", report.message);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries the progress stream.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_atlas=info,warn"),
            1 => EnvFilter::new("link_atlas=debug,info"),
            2 => EnvFilter::new("link_atlas=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.request_timeout_secs = timeout;
    }

    validate(&config).context("Invalid command-line options")?;
    Ok(config)
}

async fn cancel_on_interrupt(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("Interrupt received, stopping crawl");
        cancel.cancel();
    }
}

/// Prints observer messages as JSON lines until the observer is unregistered
async fn print_messages(mut messages: mpsc::UnboundedReceiver<String>) {
    while let Some(message) = messages.recv().await {
        println!("{}", message);
    }
}
