//! JSON dump of the final records, for consumers that prefer structured data
//! over RSS.
//!
//! The file holds a pretty-printed array of
//! [`ArticleRecord`](crate::models::ArticleRecord)s in feed order.

use crate::models::ArticleRecord;
use crate::utils::ensure_parent_dir;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `records` to `path`, creating the parent directory if needed.
#[instrument(level = "info", skip_all, fields(%path, count = records.len()))]
pub async fn write_records(records: &[ArticleRecord], path: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(records)?;

    if let Err(e) = ensure_parent_dir(path).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e);
    }

    fs::write(path, json).await?;
    info!("Wrote JSON records");
    Ok(())
}
