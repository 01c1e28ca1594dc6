use crate::config::types::{Config, OutputConfig, ScraperConfig, SeedTarget};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates scraper behavior configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.timeout_seconds < 1 || config.timeout_seconds > 120 {
        return Err(ConfigError::Validation(format!(
            "timeout-seconds must be between 1 and 120, got {}",
            config.timeout_seconds
        )));
    }

    if config.encoding.is_empty() {
        return Err(ConfigError::Validation(
            "encoding cannot be empty".to_string(),
        ));
    }

    if config.delay_min_seconds > config.delay_max_seconds {
        return Err(ConfigError::Validation(format!(
            "delay-min-seconds ({}) must not exceed delay-max-seconds ({})",
            config.delay_min_seconds, config.delay_max_seconds
        )));
    }

    if config.retry_max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "retry-max-attempts must be >= 1, got {}",
            config.retry_max_attempts
        )));
    }

    Ok(())
}

/// Validates output and checkpoint paths
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.articles_dir.is_empty() {
        return Err(ConfigError::Validation(
            "articles-dir cannot be empty".to_string(),
        ));
    }

    if config.crawl_checkpoint_path.is_empty() {
        return Err(ConfigError::Validation(
            "crawl-checkpoint-path cannot be empty".to_string(),
        ));
    }

    if config.parse_checkpoint_path.is_empty() {
        return Err(ConfigError::Validation(
            "parse-checkpoint-path cannot be empty".to_string(),
        ));
    }

    if config.crawl_checkpoint_path == config.parse_checkpoint_path {
        return Err(ConfigError::Validation(
            "crawl and parse checkpoints cannot share a file".to_string(),
        ));
    }

    Ok(())
}

/// Validates seed entries
fn validate_seeds(seeds: &[SeedTarget]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[seed]] entry is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(&seed.url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed.url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use an HTTP(S) scheme",
                seed.url
            )));
        }

        if seed.target_articles < 1 {
            return Err(ConfigError::Validation(format!(
                "target-articles for seed '{}' must be >= 1",
                seed.url
            )));
        }
    }

    Ok(())
}
