//! Listing scanner: anchors in, deduplicated article records out.

use super::card::find_card;
use super::fields::{extract_date, extract_description};
use super::region::{Region, restrict};
use super::urls::normalize_url;
use super::{DEFAULT_MAX_CARD_DEPTH, is_boilerplate};
use crate::dom::{self, TreeNode};
use crate::merge::RecordSet;
use crate::models::ArticleRecord;
use regex::Regex;
use scraper::Html;
use tracing::{debug, trace};
use url::Url;

/// Per-source rules for telling articles apart from everything else on a
/// listing page.
#[derive(Debug, Clone)]
pub struct ListingRules {
    /// Matches normalized URLs of real articles, not hubs or navigation.
    pub article_pattern: Regex,
    /// Optional section of the page to restrict the scan to.
    pub region: Option<Region>,
    /// Bound on the ancestor walk in [`find_card`].
    pub max_card_depth: usize,
    /// Label stamped on every record found.
    pub source: Option<String>,
}

impl ListingRules {
    pub fn new(article_pattern: Regex) -> Self {
        Self {
            article_pattern,
            region: None,
            max_card_depth: DEFAULT_MAX_CARD_DEPTH,
            source: None,
        }
    }
}

/// Scan `nodes` (a whole document, in document order) into `records`.
///
/// Returns how many anchors were accepted as article links, duplicates
/// included.
pub fn scan_nodes<N: TreeNode>(
    nodes: Vec<N>,
    base: &Url,
    rules: &ListingRules,
    records: &mut RecordSet,
) -> usize {
    let nodes = match &rules.region {
        Some(region) => restrict(nodes, region),
        None => nodes,
    };

    let mut accepted = 0;
    for anchor in nodes.iter().filter(|n| n.tag_name() == "a") {
        let Some(href) = anchor.attribute("href") else {
            continue;
        };
        let url = normalize_url(base, &href);
        if !rules.article_pattern.is_match(&url) {
            trace!(%url, "Skipping non-article link");
            continue;
        }

        let title = anchor.flat_text();
        if title.is_empty() || is_boilerplate(&title) {
            trace!(%url, %title, "Skipping untitled or boilerplate anchor");
            continue;
        }

        let card = find_card(anchor, rules.max_card_depth);
        let published_at = extract_date(&card);
        let description = extract_description(&card, &title);

        accepted += 1;
        records.upsert(ArticleRecord {
            url,
            title,
            description,
            published_at,
            source: rules.source.clone(),
        });
    }
    accepted
}

/// Parse `html` and scan it into `records`.
pub fn scan_document(html: &str, base: &Url, rules: &ListingRules, records: &mut RecordSet) -> usize {
    let document = Html::parse_document(html);
    let accepted = scan_nodes(dom::document_nodes(&document), base, rules, records);
    debug!(accepted, unique = records.len(), "Scanned document");
    accepted
}
