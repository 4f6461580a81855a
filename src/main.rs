//! # Listing RSS
//!
//! Turns "news" or "insights" listing pages that publish no feed of their own
//! into an RSS 2.0 file.
//!
//! ## Features
//!
//! - Finds article links on a listing page by URL pattern, ignoring hubs,
//!   navigation and "Read more" buttons
//! - Recovers each article's date and teaser from the card around its link
//! - Optional restriction to one section of the page (between two headings)
//! - Pagination, several sources per feed, and article page enrichment
//! - Writes RSS 2.0 and, optionally, a JSON dump of the same records
//!
//! ## Usage
//!
//! ```sh
//! listing_rss --listing https://www.colliers.com/en/news -o docs/colliers.xml
//! listing_rss -c config/colliers.yaml
//! ```
//!
//! ## Architecture
//!
//! 1. **Indexing**: fetch each listing and scan it into article records
//! 2. **Enrichment**: optionally fetch article pages for missing fields
//! 3. **Merging**: deduplicate across sources and order newest first
//! 4. **Output**: write the RSS feed (and JSON)

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dates;
mod dom;
mod extract;
mod feed;
mod fetch;
mod merge;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::{Settings, load_config};
use fetch::{HttpFetcher, RetryFetch};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("listing_rss starting up");

    let args = Cli::parse();
    debug!(?args.listings, ?args.config, out = %args.out, "Parsed CLI arguments");

    let file = match &args.config {
        Some(path) => Some(load_config(path)?),
        None => None,
    };
    let settings = Settings::resolve(&args, file).map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    info!(
        sources = settings.sources.len(),
        limit = settings.limit,
        delay_ms = settings.delay.as_millis() as u64,
        "Configuration resolved"
    );

    let fetcher = RetryFetch::new(
        HttpFetcher::new(settings.timeout)?,
        settings.retries,
        Duration::from_secs(1),
    );

    let result = pipeline::build_feed(&fetcher, &settings).await;

    let elapsed = start_time.elapsed();
    match result {
        Ok(report) => {
            println!("{}", report.summary_line());
            info!(
                ?elapsed,
                secs = elapsed.as_secs(),
                millis = elapsed.subsec_millis(),
                "Execution complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(?elapsed, error = %e, "Build failed; no feed written");
            Err(e)
        }
    }
}
