//! Network-facing side of a build.
//!
//! Each configured source goes through the same two phases:
//!
//! 1. **Indexing** ([`listing`]): fetch the listing page(s), or read a
//!    pre-rendered snapshot, and scan them into records
//! 2. **Enrichment** ([`details`], opt-in): fetch article pages for records
//!    still missing a date or description
//!
//! All requests of a build are issued one at a time with a fixed politeness
//! delay between them; listing sites rate-limit aggressive clients.
//!
//! # Error handling
//!
//! | Failure | Effect |
//! |---------|--------|
//! | first listing page / snapshot | fatal, the build stops |
//! | later listing page | pagination ends, earlier pages kept |
//! | article detail page | that article keeps its listing fields |

pub mod details;
pub mod listing;
