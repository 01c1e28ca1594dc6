//! Link discovery
//!
//! Turns the configured seed listing pages into the run's ordered,
//! deduplicated list of article URLs. Each seed resolves to its source
//! profile, listing documents are gathered per the source's pagination
//! strategy (checkpointing counted pages as they arrive), and the link rule
//! plus join rule produce absolute article URLs.

use crate::checkpoint::CrawlCheckpointStore;
use crate::config::SeedTarget;
use crate::fetch::Gateway;
use crate::sources::{LinkRule, Pagination, SourceRegistry};
use crate::Result;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Ordered set of discovered URLs
///
/// Uniqueness is enforced across the whole run; insertion order is the
/// processing order.
#[derive(Debug, Default)]
pub struct UrlSet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl UrlSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a URL, returning false if it was already present
    pub fn insert(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.ordered.push(url);
        true
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

/// Computes which `listing?page=N` pages still need fetching
///
/// Pages run from the checkpointed `pages_fetched + 1` up to
/// `ceil(target / page_size) - 1` inclusive; the range is empty once the
/// checkpoint has caught up.
pub fn listing_pages_to_fetch(
    pages_fetched: usize,
    target: usize,
    page_size: usize,
) -> RangeInclusive<usize> {
    let last_page = target.div_ceil(page_size).saturating_sub(1);
    (pages_fetched + 1)..=last_page
}

/// Applies a link rule to one listing document, returning absolute URLs
/// in document order
///
/// The selector may match the anchors themselves or containers around them;
/// in the latter case the first descendant anchor is used. Nodes that yield
/// no usable URL are discarded.
pub fn extract_listing_links(html: &str, rule: &LinkRule) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse(&rule.selector) else {
        tracing::warn!("Unparseable link selector: {}", rule.selector);
        return Vec::new();
    };
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for element in document.select(&selector) {
        let href = element
            .value()
            .attr("href")
            .or_else(|| {
                element
                    .select(&anchor_selector)
                    .next()
                    .and_then(|anchor| anchor.value().attr("href"))
            });

        if let Some(href) = href {
            if let Some(url) = rule.join.resolve(href) {
                links.push(url);
            }
        }
    }
    links
}

/// Discovers article URLs for all seeds
///
/// Per-seed failures are logged and never stop the other seeds: an unknown
/// source skips that seed, a failed single-shot or rendered listing fetch
/// yields zero links for it, and a failed counted page stops that source's
/// pagination for this run (the unadvanced checkpoint retries it next run).
/// Only checkpoint persistence failures propagate.
pub async fn discover_articles(
    seeds: &[SeedTarget],
    registry: &SourceRegistry,
    gateway: &Gateway,
    crawl_store: &mut CrawlCheckpointStore,
) -> Result<Vec<String>> {
    let mut discovered = UrlSet::new();

    for seed in seeds {
        let source = match registry.resolve(&seed.url) {
            Ok(source) => source,
            Err(err) => {
                tracing::error!("Skipping seed {}: {}", seed.url, err);
                continue;
            }
        };

        let documents = match source.pagination {
            Pagination::None => match gateway.fetch_static(&seed.url).await {
                Ok(response) if response.is_success() => vec![response.body],
                Ok(response) => {
                    tracing::warn!(
                        "Listing fetch for {} returned HTTP {}, no links from this seed",
                        seed.url,
                        response.status
                    );
                    Vec::new()
                }
                Err(err) => {
                    tracing::warn!("Listing fetch for {} failed: {}", seed.url, err);
                    Vec::new()
                }
            },

            Pagination::CountedPages { page_size } => {
                let already_fetched = crawl_store.pages_fetched(&source.bucket);
                for page in
                    listing_pages_to_fetch(already_fetched, seed.target_articles, page_size)
                {
                    let page_url = format!("{}?page={}", seed.url, page);
                    match gateway.fetch_static(&page_url).await {
                        Ok(response) if response.is_success() => {
                            crawl_store.append_page(&source.bucket, response.body)?;
                        }
                        Ok(response) => {
                            // The counter stays put, so the next run retries
                            // this exact page.
                            tracing::warn!(
                                "Listing page {} returned HTTP {}, stopping pagination for {}",
                                page_url,
                                response.status,
                                source.bucket
                            );
                            break;
                        }
                        Err(err) => {
                            tracing::warn!(
                                "Listing page {} failed ({}), stopping pagination for {}",
                                page_url,
                                err,
                                source.bucket
                            );
                            break;
                        }
                    }
                }
                crawl_store.load(&source.bucket).raw_page_contents
            }

            Pagination::ScrollCount { articles_per_scroll } => {
                let scrolls = (seed.target_articles / articles_per_scroll).max(1);
                match gateway.fetch_rendered(&seed.url, scrolls).await {
                    Ok(body) => vec![body],
                    Err(err) => {
                        tracing::warn!("Rendered listing fetch for {} failed: {}", seed.url, err);
                        Vec::new()
                    }
                }
            }
        };

        let before = discovered.len();
        for document in &documents {
            for link in extract_listing_links(document, &source.link_rule) {
                discovered.insert(link);
            }
        }
        tracing::info!(
            "Seed {}: {} new article URLs ({} total)",
            seed.url,
            discovered.len() - before,
            discovered.len()
        );
    }

    Ok(discovered.into_vec())
}
