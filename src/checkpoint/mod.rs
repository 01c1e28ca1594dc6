//! Durable checkpoint stores
//!
//! Two independent JSON files let an interrupted run resume without
//! repeating work:
//! - [`CrawlCheckpointStore`]: listing-pagination progress per source
//! - [`ParseCheckpointStore`]: which discovered URLs still await parsing
//!
//! Every update rewrites the whole file through a temp file in the same
//! directory followed by an atomic rename, so a reader never observes a
//! partially written checkpoint and content always lands together with the
//! counter that describes it.

mod crawl;
mod parse;

pub use crawl::{CrawlCheckpoint, CrawlCheckpointStore};
pub use parse::{ParseCheckpoint, ParseCheckpointStore};

use crate::{Result, ScrapeError};
use std::io::Write;
use std::path::Path;

/// Writes `content` to `path` atomically (temp file + rename)
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ScrapeError::Io(e.error))?;
    Ok(())
}

/// Builds the fatal corruption error for a checkpoint file
fn corruption(path: &Path, message: impl Into<String>) -> ScrapeError {
    ScrapeError::CheckpointCorruption {
        path: path.display().to_string(),
        message: message.into(),
    }
}
