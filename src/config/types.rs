use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Gazeta
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    #[serde(rename = "seed", default)]
    pub seeds: Vec<SeedTarget>,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Seconds to wait for a response before giving up
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// Response encoding used when a page omits its charset
    pub encoding: String,

    /// Lower bound of the randomized pre-request politeness delay (seconds)
    #[serde(rename = "delay-min-seconds", default = "default_delay_min")]
    pub delay_min_seconds: u64,

    /// Upper bound of the randomized pre-request politeness delay (seconds)
    #[serde(rename = "delay-max-seconds", default = "default_delay_max")]
    pub delay_max_seconds: u64,

    /// Maximum attempts per fetch before the failure is reported
    #[serde(rename = "retry-max-attempts", default = "default_retry_attempts")]
    pub retry_max_attempts: u32,

    /// Base backoff between retry attempts (milliseconds, doubled per attempt)
    #[serde(rename = "retry-backoff-ms", default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,

    /// Extra request headers sent with every static fetch
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Output and checkpoint file locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding one bucket subdirectory per source
    #[serde(rename = "articles-dir")]
    pub articles_dir: String,

    /// Path of the listing-pagination checkpoint file
    #[serde(rename = "crawl-checkpoint-path")]
    pub crawl_checkpoint_path: String,

    /// Path of the article-parse checkpoint file
    #[serde(rename = "parse-checkpoint-path")]
    pub parse_checkpoint_path: String,
}

/// One configured listing page with its target article count
#[derive(Debug, Clone, Deserialize)]
pub struct SeedTarget {
    /// Listing page URL enumerating article links for one source
    pub url: String,

    /// Soft cap on articles to collect from this seed
    #[serde(rename = "target-articles")]
    pub target_articles: usize,
}

fn default_delay_min() -> u64 {
    1
}

fn default_delay_max() -> u64 {
    10
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    5000
}
