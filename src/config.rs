//! Run configuration: YAML file plus command-line overrides.
//!
//! # File format
//!
//! ```yaml
//! channel:
//!   title: Colliers News (unofficial)
//!   language: en
//! sources:
//!   - label: Colliers
//!     listing: https://www.colliers.com/en/news
//!     article_pattern: '^https://www\.colliers\.com/en/news/[^/]+$'
//!     region:
//!       start: [News]
//!       stop: [Podcasts, Media Mentions]
//!     pages: 3
//! ```
//!
//! Every field except `listing` is optional. A source without an
//! `article_pattern` accepts any link below its listing path.

use crate::cli::Cli;
use crate::extract::region::Region;
use crate::extract::scanner::ListingRules;
use crate::extract::urls::normalize_url;
use crate::models::FeedChannel;
use crate::utils::{site_label, upcase};
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_PAGE_PARAM: &str = "page";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_DESCRIPTION: &str = "Unofficial RSS feed generated from listing pages.";

/// Top-level shape of the YAML config file.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChannelConfig {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
}

/// One listing source as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub listing: String,
    pub label: Option<String>,
    pub article_pattern: Option<String>,
    pub region: Option<Region>,
    pub pages: Option<u32>,
    pub page_param: Option<String>,
    /// Pre-rendered DOM dump to scan instead of fetching the listing.
    pub snapshot: Option<PathBuf>,
    #[serde(default)]
    pub fetch_details: bool,
    pub max_card_depth: Option<usize>,
}

impl SourceConfig {
    fn from_listing(listing: &str) -> Self {
        Self {
            listing: listing.to_string(),
            label: None,
            article_pattern: None,
            region: None,
            pages: None,
            page_param: None,
            snapshot: None,
            fetch_details: false,
            max_card_depth: None,
        }
    }
}

/// A source ready to be scanned.
#[derive(Debug, Clone)]
pub struct Source {
    pub label: String,
    pub listing: Url,
    pub rules: ListingRules,
    pub pages: u32,
    pub page_param: String,
    pub snapshot: Option<PathBuf>,
    pub fetch_details: bool,
}

/// Everything one build needs.
#[derive(Debug, Clone)]
pub struct Settings {
    pub channel: FeedChannel,
    pub sources: Vec<Source>,
    pub limit: usize,
    pub out: String,
    pub json_out: Option<String>,
    pub delay: Duration,
    pub timeout: Duration,
    pub retries: usize,
}

/// Read and parse a YAML config file.
#[instrument(level = "info")]
pub fn load_config(path: &str) -> Result<FileConfig, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {path}: {e}"))?;
    let config: FileConfig =
        serde_yaml::from_str(&raw).map_err(|e| format!("invalid config {path}: {e}"))?;
    debug!(sources = config.sources.len(), "Loaded config file");
    Ok(config)
}

impl Settings {
    /// Combine the config file (if any) with command-line arguments.
    ///
    /// Sources from the file come first, then `--listing` ones. Command-line
    /// `--pages` and `--fetch-details` apply to sources that do not set their
    /// own value.
    pub fn resolve(cli: &Cli, file: Option<FileConfig>) -> Result<Self, Box<dyn Error>> {
        let file = file.unwrap_or_default();
        let mut configs = file.sources;
        configs.extend(cli.listings.iter().map(|l| SourceConfig::from_listing(l)));
        if configs.is_empty() {
            return Err("no listing sources configured (use --listing or a config file)".into());
        }

        let sources = configs
            .into_iter()
            .map(|c| resolve_source(c, cli))
            .collect::<Result<Vec<_>, _>>()?;

        let channel = FeedChannel {
            title: cli
                .title
                .clone()
                .or(file.channel.title)
                .unwrap_or_else(|| default_title(&sources)),
            link: file
                .channel
                .link
                .unwrap_or_else(|| sources[0].listing.to_string()),
            description: cli
                .description
                .clone()
                .or(file.channel.description)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            language: file
                .channel
                .language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        };

        Ok(Self {
            channel,
            sources,
            limit: cli.limit,
            out: cli.out.clone(),
            json_out: cli.json_out.clone(),
            delay: Duration::from_millis(cli.delay_ms),
            timeout: Duration::from_secs(cli.timeout_secs),
            retries: cli.retries,
        })
    }
}

fn resolve_source(config: SourceConfig, cli: &Cli) -> Result<Source, Box<dyn Error>> {
    let listing = Url::parse(config.listing.trim())
        .map_err(|e| format!("invalid listing URL {}: {e}", config.listing))?;

    let pattern = match &config.article_pattern {
        Some(p) => p.clone(),
        None => default_article_pattern(&listing),
    };
    let article_pattern =
        Regex::new(&pattern).map_err(|e| format!("invalid article_pattern for {listing}: {e}"))?;

    let label = config
        .label
        .clone()
        .or_else(|| site_label(listing.as_str()).map(|l| upcase(&l)))
        .unwrap_or_else(|| listing.to_string());

    let mut rules = ListingRules::new(article_pattern);
    rules.region = config.region.clone();
    rules.source = Some(label.clone());
    if let Some(depth) = config.max_card_depth {
        rules.max_card_depth = depth;
    }

    Ok(Source {
        label,
        listing,
        rules,
        pages: config.pages.unwrap_or(cli.pages).max(1),
        page_param: config
            .page_param
            .unwrap_or_else(|| DEFAULT_PAGE_PARAM.to_string()),
        snapshot: config.snapshot,
        fetch_details: config.fetch_details || cli.fetch_details,
    })
}

/// Article links are taken to live strictly below the listing path.
pub fn default_article_pattern(listing: &Url) -> String {
    let root = normalize_url(listing, listing.as_str());
    format!("^{}/.+", regex::escape(&root))
}

fn default_title(sources: &[Source]) -> String {
    match sources {
        [only] => format!("{} News (unofficial)", only.label),
        _ => "Listing News (unofficial)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DEFAULT_MAX_CARD_DEPTH;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["listing_rss"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_default_pattern_accepts_children_only() {
        let listing = Url::parse("https://www.colliers.com/en/news/").unwrap();
        let re = Regex::new(&default_article_pattern(&listing)).unwrap();
        assert!(re.is_match("https://www.colliers.com/en/news/q3-results"));
        assert!(!re.is_match("https://www.colliers.com/en/news"));
        assert!(!re.is_match("https://www.colliers.com/en/newsroom"));
        assert!(!re.is_match("https://www.colliers.com/en/services"));
    }

    #[test]
    fn test_resolve_from_cli_only() {
        let settings =
            Settings::resolve(&cli(&["--listing", "https://www.colliers.com/en/news"]), None).unwrap();
        assert_eq!(settings.sources.len(), 1);
        let source = &settings.sources[0];
        assert_eq!(source.label, "Colliers");
        assert_eq!(source.pages, 1);
        assert_eq!(source.page_param, "page");
        assert_eq!(source.rules.source.as_deref(), Some("Colliers"));
        assert_eq!(settings.channel.title, "Colliers News (unofficial)");
        assert_eq!(settings.channel.link, "https://www.colliers.com/en/news");
        assert_eq!(settings.channel.language, "en");
        assert_eq!(settings.limit, 50);
    }

    #[test]
    fn test_resolve_requires_a_source() {
        let err = Settings::resolve(&cli(&[]), None).unwrap_err();
        assert!(err.to_string().contains("no listing sources"));
    }

    #[test]
    fn test_resolve_rejects_bad_pattern() {
        let file: FileConfig = serde_yaml::from_str(
            "sources:\n  - listing: https://www.colliers.com/en/news\n    article_pattern: '(['\n",
        )
        .unwrap();
        assert!(Settings::resolve(&cli(&[]), Some(file)).is_err());
    }

    #[test]
    fn test_yaml_sources_with_cli_overrides() {
        let yaml = r#"
channel:
  title: CRE News
  language: en-CA
sources:
  - label: Colliers
    listing: https://www.colliers.com/en/news
    article_pattern: '^https://www\.colliers\.com/en/news/[^/]+$'
    region:
      start: [News]
      stop: [Podcasts, Media Mentions]
    pages: 3
  - listing: https://www.example.com/transactions
    fetch_details: true
"#;
        let file: FileConfig = serde_yaml::from_str(yaml).unwrap();
        let settings = Settings::resolve(
            &cli(&["-p", "2", "--listing", "https://www.cbre.com/insights", "--description", "Mine"]),
            Some(file),
        )
        .unwrap();

        assert_eq!(settings.channel.title, "CRE News");
        assert_eq!(settings.channel.description, "Mine");
        assert_eq!(settings.channel.language, "en-CA");

        let labels: Vec<&str> = settings.sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Colliers", "Example", "Cbre"]);

        let colliers = &settings.sources[0];
        assert_eq!(colliers.pages, 3);
        assert_eq!(
            colliers.rules.region.as_ref().unwrap().stop,
            vec!["Podcasts", "Media Mentions"]
        );
        assert!(!colliers.fetch_details);
        assert_eq!(colliers.rules.max_card_depth, DEFAULT_MAX_CARD_DEPTH);

        let example = &settings.sources[1];
        assert_eq!(example.pages, 2);
        assert!(example.fetch_details);
    }
}
