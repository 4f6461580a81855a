//! Listing extraction engine.
//!
//! Turns a listing page into [`ArticleRecord`](crate::models::ArticleRecord)s:
//!
//! 1. [`urls`]: canonical article identity from raw hrefs
//! 2. [`card`]: the container around an anchor that holds its date
//! 3. [`fields`]: publish date and description recovered from that card
//! 4. [`region`]: optional scoping to one heading-delimited page section
//! 5. [`scanner`]: drives the above over every anchor of a document
//!
//! Everything here is synchronous and free of I/O.

pub mod card;
pub mod fields;
pub mod region;
pub mod scanner;
pub mod urls;

/// Navigation and call-to-action texts that are never article titles or
/// descriptions. Compared lowercase and trimmed.
pub const SKIP_TEXT: &[&str] = &[
    "read more",
    "view more",
    "view all news",
    "view all",
    "view podcasts",
    "view media mentions",
    "learn more",
];

/// Default bound on the ancestor walk when looking for a card.
pub const DEFAULT_MAX_CARD_DEPTH: usize = 10;

pub fn is_boilerplate(text: &str) -> bool {
    let low = text.trim().to_lowercase();
    SKIP_TEXT.contains(&low.as_str())
}
