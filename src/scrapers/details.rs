//! Article page enrichment.
//!
//! Some listings print no date or teaser next to a link. When enabled for a
//! source, each record still missing one of them has its article page
//! fetched and the page metadata consulted:
//!
//! | Field | Looked up in (first hit wins) |
//! |-------|-------------------------------|
//! | date | `article:published_time`, `meta[name=date]`, `datePublished`, `time[datetime]` |
//! | description | `og:description`, `meta[name=description]` |
//!
//! Fetches are sequential with the politeness delay before each one. A failed
//! fetch only costs that article its upgrade.

use crate::dates::parse_date;
use crate::dom::collapse_whitespace;
use crate::extract::fields::accept_description;
use crate::fetch::PageFetcher;
use crate::models::ArticleRecord;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// `(selector, attribute holding the value)`
static DATE_SOURCES: Lazy<Vec<(Selector, &'static str)>> = Lazy::new(|| {
    [
        (r#"meta[property="article:published_time"]"#, "content"),
        (r#"meta[name="date"]"#, "content"),
        (r#"meta[itemprop="datePublished"]"#, "content"),
        ("time[datetime]", "datetime"),
    ]
    .into_iter()
    .map(|(css, attr)| (Selector::parse(css).expect("valid selector"), attr))
    .collect()
});

static DESCRIPTION_SOURCES: Lazy<Vec<(Selector, &'static str)>> = Lazy::new(|| {
    [
        (r#"meta[property="og:description"]"#, "content"),
        (r#"meta[name="description"]"#, "content"),
    ]
    .into_iter()
    .map(|(css, attr)| (Selector::parse(css).expect("valid selector"), attr))
    .collect()
});

/// What an article page says about itself.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DetailFields {
    pub published_at: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// Read publish date and description from an article page's metadata.
pub fn parse_detail_page(html: &str, title: &str) -> DetailFields {
    let document = Html::parse_document(html);

    let published_at = DATE_SOURCES.iter().find_map(|(selector, attr)| {
        document
            .select(selector)
            .filter_map(|el| el.value().attr(attr))
            .find_map(parse_date)
    });

    let description = DESCRIPTION_SOURCES.iter().find_map(|(selector, attr)| {
        document
            .select(selector)
            .filter_map(|el| el.value().attr(attr))
            .find_map(|content| accept_description(&collapse_whitespace([content]), title))
    });

    DetailFields {
        published_at,
        description,
    }
}

/// Fill missing dates and descriptions of `records` from their article pages.
///
/// Only absent fields are written. Returns the number of records that gained
/// at least one field.
#[instrument(level = "info", skip_all, fields(records = records.len()))]
pub async fn enrich<F: PageFetcher>(
    fetcher: &F,
    records: &mut [ArticleRecord],
    delay: Duration,
) -> usize {
    let targets: Vec<(usize, String, String)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.published_at.is_none() || r.description.is_none())
        .map(|(i, r)| (i, r.url.clone(), r.title.clone()))
        .collect();
    debug!(targets = targets.len(), "Records needing detail pages");

    let found: Vec<(usize, DetailFields)> = stream::iter(targets)
        .then(|(i, url, title)| async move {
            sleep(delay).await;
            match fetcher.fetch(&url).await {
                Ok(html) => Some((i, parse_detail_page(&html, &title))),
                Err(e) => {
                    warn!(%url, error = %e, "Detail page fetch failed; skipping article");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    let mut upgraded = 0;
    for (i, fields) in found {
        let record = &mut records[i];
        let mut changed = false;
        if record.published_at.is_none() && fields.published_at.is_some() {
            record.published_at = fields.published_at;
            changed = true;
        }
        if record.description.is_none() && fields.description.is_some() {
            record.description = fields.description;
            changed = true;
        }
        if changed {
            upgraded += 1;
        }
    }
    upgraded
}
