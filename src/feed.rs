//! Feed assembly: ordered records to RSS entries.

use crate::models::{ArticleRecord, FeedEntry};

/// Map ordered records to feed entries, keeping their order.
///
/// When several sources share one feed, titles are prefixed with the source
/// label so readers can tell origins apart.
///
/// # Arguments
///
/// * `records` - Records in final feed order
/// * `prefix_source` - Whether to prefix titles with `"{label}: "`
///
/// # Returns
///
/// One entry per record, in the same order.
pub fn assemble(records: &[ArticleRecord], prefix_source: bool) -> Vec<FeedEntry> {
    records
        .iter()
        .map(|r| {
            let title = match (&r.source, prefix_source) {
                (Some(label), true) => format!("{label}: {}", r.title),
                _ => r.title.clone(),
            };
            FeedEntry {
                id: r.url.clone(),
                link: r.url.clone(),
                title,
                published: r.published_at,
                description: r.description.clone(),
                category: r.source.clone(),
            }
        })
        .collect()
}
