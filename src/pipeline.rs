//! One complete build: every source indexed, merged, and written out.

use crate::config::Settings;
use crate::feed;
use crate::fetch::PageFetcher;
use crate::merge::merge_sources;
use crate::outputs::{json, rss};
use crate::scrapers::listing::index_source;
use itertools::Itertools;
use std::error::Error;
use tracing::{error, info, instrument};

/// Item count contributed by one source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReport {
    pub label: String,
    pub count: usize,
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub out: String,
    pub sources: Vec<SourceReport>,
    pub total: usize,
}

impl BuildReport {
    /// One-line summary printed at the end of a run.
    pub fn summary_line(&self) -> String {
        let per_source = self
            .sources
            .iter()
            .map(|s| format!("{}: {}", s.label, s.count))
            .join(", ");
        format!("Wrote {} ({} items; {})", self.out, self.total, per_source)
    }
}

/// Index every source in order, merge them, and write the feed.
///
/// A source whose listing cannot be fetched aborts the build before anything
/// is written.
#[instrument(level = "info", skip_all, fields(sources = settings.sources.len()))]
pub async fn build_feed<F: PageFetcher>(
    fetcher: &F,
    settings: &Settings,
) -> Result<BuildReport, Box<dyn Error>> {
    let mut per_source = Vec::with_capacity(settings.sources.len());
    let mut reports = Vec::with_capacity(settings.sources.len());

    for source in &settings.sources {
        let records = index_source(fetcher, source, settings.limit, settings.delay)
            .await
            .map_err(|e| {
                error!(source = %source.label, listing = %source.listing, error = %e, "Listing source failed");
                e
            })?;
        reports.push(SourceReport {
            label: source.label.clone(),
            count: records.len(),
        });
        per_source.push(records);
    }

    let combined = merge_sources(per_source, settings.limit);
    info!(total = combined.len(), "Merged sources");

    let entries = feed::assemble(&combined, settings.sources.len() > 1);
    rss::write_feed(&settings.channel, &entries, &settings.out).await?;

    if let Some(path) = &settings.json_out {
        json::write_records(&combined, path).await?;
    }

    Ok(BuildReport {
        out: settings.out.clone(),
        sources: reports,
        total: combined.len(),
    })
}
