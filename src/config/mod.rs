//! Configuration module for Gazeta
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files: request behavior (timeout, encoding, headers, politeness delay,
//! retry policy), output and checkpoint paths, and the seed listing pages
//! with their per-source target article counts.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ScraperConfig, SeedTarget};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
