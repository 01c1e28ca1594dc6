use crate::checkpoint::{corruption, write_atomic};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Pagination progress for one source
///
/// `pages_fetched` only grows, and every increment is persisted together
/// with the page content that justified it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlCheckpoint {
    pub pages_fetched: usize,
    pub raw_page_contents: Vec<String>,
}

/// Durable store of listing-pagination progress, one record per source
/// bucket, all held in a single JSON file
pub struct CrawlCheckpointStore {
    path: PathBuf,
    state: BTreeMap<String, CrawlCheckpoint>,
}

impl CrawlCheckpointStore {
    /// Opens the store, loading existing progress if the file is present
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScrapeError::CheckpointCorruption`] when the file
    /// exists but fails to parse, or when any record's content length
    /// disagrees with its counter. Resuming on such a file risks re-fetching
    /// or skipping pages, so the run must not proceed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let state: BTreeMap<String, CrawlCheckpoint> = serde_json::from_str(&content)
                .map_err(|e| corruption(&path, format!("unparseable JSON: {e}")))?;

            for (bucket, record) in &state {
                if record.raw_page_contents.len() != record.pages_fetched {
                    return Err(corruption(
                        &path,
                        format!(
                            "bucket '{}' records {} fetched pages but holds {} page bodies",
                            bucket,
                            record.pages_fetched,
                            record.raw_page_contents.len()
                        ),
                    ));
                }
            }

            state
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, state })
    }

    /// Returns the checkpoint for a bucket, empty if none exists yet
    pub fn load(&self, bucket: &str) -> CrawlCheckpoint {
        self.state.get(bucket).cloned().unwrap_or_default()
    }

    /// Number of listing pages already fetched for a bucket
    pub fn pages_fetched(&self, bucket: &str) -> usize {
        self.state
            .get(bucket)
            .map(|record| record.pages_fetched)
            .unwrap_or(0)
    }

    /// Appends one fetched listing page and advances the counter, persisting
    /// before returning
    ///
    /// The whole store is written in one atomic replace, so a crash right
    /// after this returns loses nothing, and a crash during the write leaves
    /// the previous file intact with the counter unadvanced.
    pub fn append_page(&mut self, bucket: &str, content: String) -> Result<()> {
        let mut next = self.state.clone();
        let record = next.entry(bucket.to_string()).or_default();
        record.raw_page_contents.push(content);
        record.pages_fetched += 1;

        let json = serde_json::to_string(&next)?;
        write_atomic(&self.path, &json)?;

        // Commit in memory only after the durable write succeeded
        self.state = next;
        Ok(())
    }
}
