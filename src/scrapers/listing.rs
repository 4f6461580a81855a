//! Listing page indexing for one configured source.
//!
//! # Pages
//!
//! The first page is the listing URL itself (or the source's pre-rendered
//! snapshot file). Further pages add `?{page_param}=N`, so for
//! `https://www.colliers.com/en/news` with three pages:
//!
//! ```text
//! https://www.colliers.com/en/news
//! https://www.colliers.com/en/news?page=2
//! https://www.colliers.com/en/news?page=3
//! ```
//!
//! Pages are fetched one after another with a politeness delay in between.

use super::details;
use crate::config::Source;
use crate::extract::scanner::scan_document;
use crate::fetch::{FetchError, PageFetcher};
use crate::merge::{RecordSet, sort_newest_first};
use crate::models::ArticleRecord;
use crate::utils::truncate_for_log;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};
use url::Url;

/// URL of page `page` of a paginated listing. Other query pairs are kept.
pub fn page_url(listing: &Url, param: &str, page: u32) -> Url {
    let mut url = listing.clone();
    let kept: Vec<(String, String)> = listing
        .query_pairs()
        .filter(|(k, _)| k != param)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &kept {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(param, &page.to_string());
    }
    url
}

/// Index one source: scan its listing page(s) and return at most `limit`
/// records, newest first.
///
/// Failing to obtain the first page is fatal for the source. A failing later
/// page ends pagination; what was already scanned is kept. Pagination also
/// stops at the first page that adds no new article.
#[instrument(level = "info", skip_all, fields(source = %source.label))]
pub async fn index_source<F: PageFetcher>(
    fetcher: &F,
    source: &Source,
    limit: usize,
    delay: Duration,
) -> Result<Vec<ArticleRecord>, FetchError> {
    let mut records = RecordSet::default();

    let first = match &source.snapshot {
        Some(path) => read_snapshot(path).await?,
        None => fetcher.fetch(source.listing.as_str()).await?,
    };
    let accepted = scan_document(&first, &source.listing, &source.rules, &mut records);
    info!(page = 1, accepted, unique = records.len(), "Scanned listing page");
    if records.is_empty() {
        warn!(
            listing = %source.listing,
            preview = %truncate_for_log(first.trim(), 200),
            "No article links on first listing page; page may be script-rendered or pattern too strict"
        );
    }

    if source.snapshot.is_none() {
        for page in 2..=source.pages {
            sleep(delay).await;
            let url = page_url(&source.listing, &source.page_param, page);
            let html = match fetcher.fetch(url.as_str()).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(%url, error = %e, "Listing page failed; keeping pages already scanned");
                    break;
                }
            };
            let before = records.len();
            let accepted = scan_document(&html, &url, &source.rules, &mut records);
            info!(page, accepted, unique = records.len(), "Scanned listing page");
            if records.len() == before {
                info!(page, "No new articles; stopping pagination");
                break;
            }
        }
    }

    // Undated records sort last, so enrichment has to see them before the
    // limit is applied.
    let items = if source.fetch_details {
        let mut items = records.into_sorted(usize::MAX);
        let upgraded = details::enrich(fetcher, &mut items, delay).await;
        info!(upgraded, "Detail pages applied");
        sort_newest_first(&mut items);
        items.truncate(limit);
        items
    } else {
        records.into_sorted(limit)
    };

    info!(count = items.len(), "Indexed listing");
    Ok(items)
}

async fn read_snapshot(path: &Path) -> Result<String, FetchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FetchError::Snapshot {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_article_pattern;
    use crate::extract::scanner::ListingRules;
    use crate::fetch::testing::StaticFetcher;
    use chrono::{TimeZone, Utc};
    use regex::Regex;

    const LISTING: &str = "https://www.colliers.com/en/news";

    fn source(pages: u32) -> Source {
        let listing = Url::parse(LISTING).unwrap();
        let mut rules = ListingRules::new(Regex::new(&default_article_pattern(&listing)).unwrap());
        rules.source = Some("Colliers".to_string());
        Source {
            label: "Colliers".to_string(),
            listing,
            rules,
            pages,
            page_param: "page".to_string(),
            snapshot: None,
            fetch_details: false,
        }
    }

    fn card(slug: &str, title: &str, date: &str) -> String {
        format!(r#"<div><a href="/en/news/{slug}">{title}</a><span>{date}</span></div>"#)
    }

    #[test]
    fn test_page_url() {
        let listing = Url::parse(LISTING).unwrap();
        assert_eq!(page_url(&listing, "page", 2).as_str(), "https://www.colliers.com/en/news?page=2");

        let listing = Url::parse("https://x.example/news?region=ca&page=1").unwrap();
        assert_eq!(
            page_url(&listing, "page", 3).as_str(),
            "https://x.example/news?region=ca&page=3"
        );
    }

    #[tokio::test]
    async fn test_pagination_merges_pages() {
        let fetcher = StaticFetcher::default()
            .page(LISTING, &(card("a", "A", "Jan 1, 2026") + &card("b", "B", "Jan 5, 2026")))
            .page(
                "https://www.colliers.com/en/news?page=2",
                &(card("b", "B again, longer", "Jan 5, 2026") + &card("c", "C", "Jan 9, 2026")),
            );

        let items = index_source(&fetcher, &source(2), 10, Duration::ZERO).await.unwrap();
        let titles: Vec<&str> = items.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B again, longer", "A"]);
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_later_page_keeps_first() {
        let fetcher = StaticFetcher::default()
            .page(LISTING, &card("a", "A", "Jan 1, 2026"))
            .failing("https://www.colliers.com/en/news?page=2", 503);

        let items = index_source(&fetcher, &source(4), 10, Duration::ZERO).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_pagination_stops_when_nothing_new() {
        let page = card("a", "A", "Jan 1, 2026");
        let fetcher = StaticFetcher::default()
            .page(LISTING, &page)
            .page("https://www.colliers.com/en/news?page=2", &page)
            .page("https://www.colliers.com/en/news?page=3", &card("z", "Z", "Jan 2, 2026"));

        let items = index_source(&fetcher, &source(3), 10, Duration::ZERO).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_enrichment_runs_before_limit() {
        let fetcher = StaticFetcher::default()
            .page(
                LISTING,
                &(card("old", "Old", "Jan 1, 2020") + &card("fresh", "Fresh", "")),
            )
            .page(
                "https://www.colliers.com/en/news/fresh",
                r#"<html><head>
                  <meta property="article:published_time" content="2026-02-04T00:00:00Z">
                </head></html>"#,
            );
        let mut src = source(1);
        src.fetch_details = true;
        // Keep the walk inside each card; the page body holds Old's date.
        src.rules.max_card_depth = 2;

        let items = index_source(&fetcher, &src, 1, Duration::ZERO).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Fresh");
        assert_eq!(
            items[0].published_at,
            Some(Utc.with_ymd_and_hms(2026, 2, 4, 0, 0, 0).unwrap())
        );
        assert!(
            fetcher
                .requested()
                .contains(&"https://www.colliers.com/en/news/fresh".to_string())
        );
    }

    #[tokio::test]
    async fn test_primary_failure_is_fatal() {
        let fetcher = StaticFetcher::default().failing(LISTING, 403);
        let err = index_source(&fetcher, &source(1), 10, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }));
    }

    #[tokio::test]
    async fn test_snapshot_replaces_fetch() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("rendered.html");
        std::fs::write(&path, card("a", "Rendered article", "Feb 4, 2026")).unwrap();

        let mut src = source(3);
        src.snapshot = Some(path);
        let fetcher = StaticFetcher::default();

        let items = index_source(&fetcher, &src, 10, Duration::ZERO).await.unwrap();
        assert_eq!(items[0].title, "Rendered article");
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_fatal() {
        let mut src = source(1);
        src.snapshot = Some("/nonexistent/listing_rss/snapshot.html".into());
        let err = index_source(&StaticFetcher::default(), &src, 10, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Snapshot { .. }));
    }
}
