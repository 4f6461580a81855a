//! Output writers.
//!
//! - [`rss`]: the RSS 2.0 feed, always written
//! - [`json`]: optional JSON dump of the same records (`--json-out`)

pub mod json;
pub mod rss;
