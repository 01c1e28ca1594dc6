//! Crawler module: discovery, extraction, and run orchestration
//!
//! - `discovery` turns seed listing pages into the deduplicated article queue
//! - `extractor` turns one article URL into body text
//! - `coordinator` strings the phases together around the checkpoint stores

mod coordinator;
mod discovery;
mod extractor;

pub use coordinator::{run_scrape, Coordinator, RunSummary};
pub use discovery::{discover_articles, extract_listing_links, listing_pages_to_fetch, UrlSet};
pub use extractor::{extract_article, extract_body};
