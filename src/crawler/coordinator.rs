//! Run coordinator
//!
//! Orchestrates a complete scrape: link discovery (skipped entirely when a
//! parse checkpoint already exists), one-time parse checkpoint
//! initialization, and the article loop that fetches, extracts, writes, and
//! advances the checkpoint one URL at a time. A restarted run picks up
//! exactly where the checkpoint left off.

use crate::checkpoint::{CrawlCheckpointStore, ParseCheckpointStore};
use crate::config::{Config, SeedTarget};
use crate::crawler::discovery::discover_articles;
use crate::crawler::extractor::extract_article;
use crate::fetch::Gateway;
use crate::output::ArticleWriter;
use crate::sources::SourceRegistry;
use crate::Result;

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Articles whose body text was written this run
    pub written: usize,

    /// Articles skipped this run (transport failure or unknown source);
    /// they consumed a sequence number but produced no file
    pub skipped: usize,

    /// Total completed count in the checkpoint after the run
    pub completed_total: usize,
}

/// Main scrape coordinator
pub struct Coordinator {
    seeds: Vec<SeedTarget>,
    registry: SourceRegistry,
    gateway: Gateway,
    crawl_store: CrawlCheckpointStore,
    parse_store: ParseCheckpointStore,
    writer: ArticleWriter,
}

impl Coordinator {
    /// Creates a coordinator from configuration and a source registry
    pub fn new(config: &Config, registry: SourceRegistry) -> Result<Self> {
        let gateway = Gateway::from_config(&config.scraper)?;
        let crawl_store = CrawlCheckpointStore::open(&config.output.crawl_checkpoint_path)?;
        let parse_store = ParseCheckpointStore::new(&config.output.parse_checkpoint_path);
        let writer = ArticleWriter::new(&config.output.articles_dir);

        Ok(Self {
            seeds: config.seeds.clone(),
            registry,
            gateway,
            crawl_store,
            parse_store,
            writer,
        })
    }

    /// Creates a coordinator from explicit parts; tests inject fake
    /// transports and temp directories through here
    pub fn with_parts(
        seeds: Vec<SeedTarget>,
        registry: SourceRegistry,
        gateway: Gateway,
        crawl_store: CrawlCheckpointStore,
        parse_store: ParseCheckpointStore,
        writer: ArticleWriter,
    ) -> Self {
        Self {
            seeds,
            registry,
            gateway,
            crawl_store,
            parse_store,
            writer,
        }
    }

    /// Runs the scrape to completion
    ///
    /// The run always leaves a consistent checkpoint state: partial failures
    /// are logged per URL, and only checkpoint corruption or local IO
    /// failures abort the run.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let discovered = if self.parse_store.exists() {
            tracing::info!("Parse checkpoint present, resuming without re-running discovery");
            Vec::new()
        } else {
            let urls = discover_articles(
                &self.seeds,
                &self.registry,
                &self.gateway,
                &mut self.crawl_store,
            )
            .await?;
            tracing::info!("Discovery complete: {} article URLs", urls.len());
            urls
        };

        let mut checkpoint = self.parse_store.initialize_if_absent(&discovered)?;
        tracing::info!(
            "Parsing {} articles ({} already completed)",
            checkpoint.remaining_urls.len(),
            checkpoint.completed_count
        );

        let mut summary = RunSummary::default();

        while let Some(url) = checkpoint.remaining_urls.first().cloned() {
            let sequence = checkpoint.next_sequence();

            if self.process_article(&url, sequence).await? {
                summary.written += 1;
            } else {
                summary.skipped += 1;
            }

            // The skip above already consumed the sequence number; either
            // way the URL is done and must never be retried by a later run.
            checkpoint = self.parse_store.advance(&url)?;
        }

        summary.completed_total = checkpoint.completed_count;
        tracing::info!(
            "Run finished: {} written, {} skipped, {} completed in total",
            summary.written,
            summary.skipped,
            summary.completed_total
        );
        Ok(summary)
    }

    /// Handles one article; returns true when a file was written
    ///
    /// Per-URL failures (unknown source, transport) are logged here and
    /// reported as a skip; anything else propagates and aborts the run.
    async fn process_article(&self, url: &str, sequence: usize) -> Result<bool> {
        let source = match self.registry.resolve(url) {
            Ok(source) => source,
            Err(err) => {
                tracing::warn!("Skipping article {}: {}", url, err);
                return Ok(false);
            }
        };

        match extract_article(&self.gateway, source, url).await {
            Ok(body) => {
                let path = self.writer.write(&source.bucket, sequence, &body)?;
                tracing::debug!("Wrote article {} to {}", sequence, path.display());
                Ok(true)
            }
            Err(err) if err.is_per_url() => {
                tracing::warn!("Skipping article {}: {}", url, err);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

/// Runs a complete scrape with the built-in source table
pub async fn run_scrape(config: &Config) -> Result<RunSummary> {
    let mut coordinator = Coordinator::new(config, SourceRegistry::builtin())?;
    coordinator.run().await
}
