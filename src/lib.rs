//! Gazeta: a resumable news article harvester
//!
//! This crate implements a small multi-source scraper that discovers article
//! links on a fixed set of news listing pages, extracts article body text with
//! source-specific structural rules, and persists one text file per article.
//! Both the listing crawl and the article parse phase checkpoint their
//! progress to disk, so an interrupted run resumes without repeating work.

pub mod checkpoint;
pub mod config;
pub mod crawler;
pub mod fetch;
pub mod output;
pub mod sources;

use thiserror::Error;

/// Main error type for Gazeta operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No registered source matches URL: {url}")]
    UnknownSource { url: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error(
        "Checkpoint file {path} is inconsistent ({message}); \
         delete or repair it before resuming"
    )]
    CheckpointCorruption { path: String, message: String },

    #[error("Checkpoint serialization error: {0}")]
    CheckpointEncode(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Builds a transport error from a reqwest error, classifying timeouts
    /// and connection failures for clearer log lines.
    pub fn transport(url: &str, err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timeout".to_string()
        } else if err.is_connect() {
            "connection refused".to_string()
        } else {
            err.to_string()
        };
        Self::Transport {
            url: url.to_string(),
            message,
        }
    }

    /// Returns true for failures that abort only the current URL, never the
    /// whole run.
    pub fn is_per_url(&self) -> bool {
        matches!(self, Self::UnknownSource { .. } | Self::Transport { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid header in config: {0}")]
    InvalidHeader(String),
}

/// Result type alias for Gazeta operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use sources::{Source, SourceRegistry};
