//! Publish date and description recovery from a card.

use super::is_boilerplate;
use crate::dates;
use crate::dom::TreeNode;
use chrono::{DateTime, Utc};

pub const MIN_DESCRIPTION_CHARS: usize = 10;
pub const MAX_DESCRIPTION_CHARS: usize = 400;

/// First month-name date in the card's text.
pub fn extract_date<N: TreeNode>(card: &N) -> Option<DateTime<Utc>> {
    dates::find_date(&card.flat_text())
}

/// First paragraph of the card that reads like a teaser for `title`.
pub fn extract_description<N: TreeNode>(card: &N, title: &str) -> Option<String> {
    card.find_all("p")
        .into_iter()
        .find_map(|p| accept_description(&p.flat_text(), title))
}

/// Returns the trimmed candidate when it is usable as a description.
///
/// Rejects empty text, boilerplate, a repeat of the title, a bare date, and
/// anything outside `MIN_DESCRIPTION_CHARS..=MAX_DESCRIPTION_CHARS` characters.
pub fn accept_description(candidate: &str, title: &str) -> Option<String> {
    let text = candidate.trim();
    if text.is_empty() || is_boilerplate(text) || text == title.trim() || dates::is_date_only(text)
    {
        return None;
    }
    let len = text.chars().count();
    if (MIN_DESCRIPTION_CHARS..=MAX_DESCRIPTION_CHARS).contains(&len) {
        Some(text.to_string())
    } else {
        None
    }
}
