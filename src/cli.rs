//! Command-line interface definitions.
//!
//! Sources can be given directly with `--listing` or described in a YAML
//! file passed with `--config`; both may be combined.

use clap::Parser;

/// Command-line arguments for the listing feed generator.
///
/// # Examples
///
/// ```sh
/// # One listing, defaults for everything else
/// listing_rss --listing https://www.colliers.com/en/news
///
/// # Several sources with regions and pagination from a config file
/// listing_rss -c feeds.yaml -o docs/cre-news.xml --limit 80
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing page URL; repeat to combine several sources into one feed
    #[arg(long = "listing", value_name = "URL")]
    pub listings: Vec<String>,

    /// Optional path to a YAML file describing the feed and its sources
    #[arg(short, long)]
    pub config: Option<String>,

    /// Maximum number of items per source and in the combined feed
    #[arg(short, long, default_value_t = 50)]
    pub limit: usize,

    /// Output path of the RSS file
    #[arg(short, long, default_value = "docs/listing-news.xml")]
    pub out: String,

    /// Number of listing pages to fetch for paginated sources
    #[arg(short, long, default_value_t = 1)]
    pub pages: u32,

    /// Also write the final records as JSON to this path
    #[arg(long)]
    pub json_out: Option<String>,

    /// Fetch article pages to fill in missing dates and descriptions
    #[arg(long)]
    pub fetch_details: bool,

    /// Politeness delay between sequential requests, in milliseconds
    #[arg(long, env = "LISTING_RSS_DELAY_MS", default_value_t = 1500)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Transport retries before a fetch counts as failed
    #[arg(long, default_value_t = 0)]
    pub retries: usize,

    /// Channel title override
    #[arg(long)]
    pub title: Option<String>,

    /// Channel description override
    #[arg(long)]
    pub description: Option<String>,
}
