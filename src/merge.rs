//! Deduplication and upgrade of repeated article discoveries.
//!
//! The same article is often linked several times from one listing (image,
//! headline, "Read more") and sometimes from several listings. [`RecordSet`]
//! keeps one record per URL, in first-discovery order, and folds every
//! rediscovery into it without ever dropping a field that was already known.

use crate::models::ArticleRecord;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::HashMap;

/// URL-keyed accumulator of [`ArticleRecord`]s.
#[derive(Debug, Default, Clone)]
pub struct RecordSet {
    records: Vec<ArticleRecord>,
    index: HashMap<String, usize>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, url: &str) -> Option<&ArticleRecord> {
        self.index.get(url).map(|&i| &self.records[i])
    }

    /// Add a discovery from the source being scanned.
    ///
    /// Returns `true` if the URL was new. Otherwise the existing record is
    /// upgraded with [`ArticleRecord::absorb`].
    pub fn upsert(&mut self, record: ArticleRecord) -> bool {
        match self.index.get(&record.url) {
            Some(&i) => {
                self.records[i].absorb(record);
                false
            }
            None => {
                self.index.insert(record.url.clone(), self.records.len());
                self.records.push(record);
                true
            }
        }
    }

    /// Fold in a discovery made by another source.
    ///
    /// Only a missing date is completed; title, description and source label
    /// of the record seen first are kept.
    pub fn merge_foreign(&mut self, record: ArticleRecord) {
        match self.index.get(&record.url) {
            Some(&i) => self.records[i].complete_date_from(&record),
            None => {
                self.index.insert(record.url.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Newest first, then the first `limit` records.
    pub fn into_sorted(self, limit: usize) -> Vec<ArticleRecord> {
        let mut records = self.records;
        sort_newest_first(&mut records);
        records.truncate(limit);
        records
    }
}

impl ArticleRecord {
    /// Upgrade with a rediscovery from the same source.
    ///
    /// - a date is adopted when missing; of two dates the later one is kept
    /// - a description is adopted when missing
    /// - a strictly longer title replaces the current one, since the shorter
    ///   variant is usually a teaser or truncated headline
    pub fn absorb(&mut self, other: ArticleRecord) {
        self.published_at = match (self.published_at, other.published_at) {
            (Some(mine), Some(theirs)) => Some(mine.max(theirs)),
            (mine, theirs) => mine.or(theirs),
        };
        if self.description.is_none() {
            self.description = other.description;
        }
        if other.title.chars().count() > self.title.chars().count() {
            self.title = other.title;
        }
    }

    /// Fill a missing date from another source's discovery of the same URL.
    pub fn complete_date_from(&mut self, other: &ArticleRecord) {
        if self.published_at.is_none() {
            self.published_at = other.published_at;
        }
    }

    /// Sort key: undated records count as the epoch.
    pub fn sort_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Stable sort by publish date, newest first. Ties keep discovery order.
pub fn sort_newest_first(records: &mut [ArticleRecord]) {
    records.sort_by_key(|r| Reverse(r.sort_date()));
}

/// Combine the per-source record lists of one build into a single feed order.
///
/// Sources are folded in the order given, so the first source to discover an
/// article owns its title, description and label.
pub fn merge_sources<I>(sources: I, limit: usize) -> Vec<ArticleRecord>
where
    I: IntoIterator<Item = Vec<ArticleRecord>>,
{
    let mut combined = RecordSet::default();
    for records in sources {
        for record in records {
            combined.merge_foreign(record);
        }
    }
    combined.into_sorted(limit)
}
