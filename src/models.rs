//! Data models shared by the extraction, merge and output stages.
//!
//! - [`ArticleRecord`]: one article discovered on a listing page
//! - [`FeedChannel`] / [`FeedEntry`]: what the RSS writer serializes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An article discovered on a listing page.
///
/// `url` is the normalized link and the record's identity: at most one record
/// per `url` leaves a build. The other fields are best-effort and may be
/// upgraded when the same article is discovered again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Normalized absolute URL (no query, fragment or trailing slash).
    pub url: String,
    /// Anchor text; never empty and never a boilerplate phrase.
    pub title: String,
    /// Teaser text from the card, 10 to 400 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Publish date, UTC. Undated records sort as the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Label of the listing source that produced the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Channel-level metadata of the generated feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedChannel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
}

/// One `<item>` of the generated feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    /// Stable identifier, the canonical article URL.
    pub id: String,
    pub link: String,
    pub title: String,
    pub published: Option<DateTime<Utc>>,
    pub description: Option<String>,
    /// Source label, emitted as `<category>`.
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_serialization_skips_absent_fields() {
        let record = ArticleRecord {
            url: "https://www.colliers.com/en/news/deal".to_string(),
            title: "Deal".to_string(),
            description: None,
            published_at: None,
            source: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("description"));
        assert!(!json.contains("source"));
        assert!(!json.contains("published_at"));
    }

    #[test]
    fn test_record_deserialization() {
        let json = r#"{
            "url": "https://www.colliers.com/en/news/deal",
            "title": "Deal",
            "published_at": "2026-02-04T00:00:00Z",
            "source": "Colliers"
        }"#;
        let record: ArticleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.description, None);
        assert_eq!(
            record.published_at,
            Some(Utc.with_ymd_and_hms(2026, 2, 4, 0, 0, 0).unwrap())
        );
        assert_eq!(record.source.as_deref(), Some("Colliers"));
    }
}
