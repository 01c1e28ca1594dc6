//! Gazeta main entry point
//!
//! Command-line interface for the resumable news article harvester.

use anyhow::Context;
use clap::Parser;
use gazeta::config::load_config_with_hash;
use gazeta::crawler::run_scrape;
use gazeta::sources::SourceRegistry;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Gazeta: a resumable news article harvester
///
/// Gazeta discovers article links on configured news listing pages, extracts
/// each article's body text with source-specific rules, and writes one text
/// file per article. Interrupted runs resume from checkpoint files without
/// re-fetching completed work.
#[derive(Parser, Debug)]
#[command(name = "gazeta")]
#[command(version = "1.0.0")]
#[command(about = "A resumable news article harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Resume an interrupted run (default behavior)
    #[arg(long, conflicts_with = "fresh")]
    resume: bool,

    /// Start a fresh run, discarding both checkpoint files
    #[arg(long, conflicts_with = "resume")]
    fresh: bool,

    /// Show resolved seeds and the source table without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    if cli.fresh {
        discard_checkpoints(&config)?;
    }

    let summary = run_scrape(&config).await?;
    tracing::info!(
        "Done: {} articles written, {} skipped",
        summary.written,
        summary.skipped
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gazeta=info,warn"),
            1 => EnvFilter::new("gazeta=debug,info"),
            2 => EnvFilter::new("gazeta=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows seeds and the source table
fn handle_dry_run(config: &gazeta::Config) {
    let registry = SourceRegistry::builtin();

    println!("=== Gazeta Dry Run ===\n");

    println!("Scraper:");
    println!("  Timeout: {}s", config.scraper.timeout_seconds);
    println!("  Encoding: {}", config.scraper.encoding);
    println!(
        "  Politeness delay: {}-{}s",
        config.scraper.delay_min_seconds, config.scraper.delay_max_seconds
    );
    println!(
        "  Retry: {} attempts, {}ms base backoff",
        config.scraper.retry_max_attempts, config.scraper.retry_backoff_ms
    );

    println!("\nOutput:");
    println!("  Articles: {}", config.output.articles_dir);
    println!("  Crawl checkpoint: {}", config.output.crawl_checkpoint_path);
    println!("  Parse checkpoint: {}", config.output.parse_checkpoint_path);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        match registry.resolve(&seed.url) {
            Ok(source) => println!(
                "  - {} -> bucket '{}', target {} articles",
                seed.url, source.bucket, seed.target_articles
            ),
            Err(_) => println!("  - {} -> NO MATCHING SOURCE", seed.url),
        }
    }

    println!("\nRegistered sources ({}):", registry.sources().len());
    for source in registry.sources() {
        println!(
            "  - pattern '{}' -> {} ({:?}, {:?})",
            source.pattern, source.bucket, source.fetch_mode, source.pagination
        );
    }
}

/// Removes both checkpoint files for a --fresh start
fn discard_checkpoints(config: &gazeta::Config) -> anyhow::Result<()> {
    for path in [
        &config.output.crawl_checkpoint_path,
        &config.output.parse_checkpoint_path,
    ] {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::info!("Removed checkpoint {}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).with_context(|| format!("failed to remove {path}")),
        }
    }
    Ok(())
}
