use crate::checkpoint::{corruption, write_atomic};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Article-parse progress for the run
///
/// `remaining_urls` keeps discovery order; `completed_count` is the number
/// of URLs already handled and the basis for article sequence numbers.
/// Completion is tracked by URL identity, so a listing page that reorders
/// between runs can never cause the wrong URL to be counted as done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseCheckpoint {
    pub remaining_urls: Vec<String>,
    pub completed_count: usize,
}

impl ParseCheckpoint {
    /// True once every discovered URL has been handled
    pub fn is_terminal(&self) -> bool {
        self.remaining_urls.is_empty()
    }

    /// Sequence number the next processed article will receive
    pub fn next_sequence(&self) -> usize {
        self.completed_count + 1
    }
}

/// Durable store of article-parse progress
///
/// The file's presence is the resume signal: a run that finds it continues
/// from `remaining_urls` instead of recomputing discovery. The store is the
/// sole source of truth for resume position.
pub struct ParseCheckpointStore {
    path: PathBuf,
}

impl ParseCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Whether a checkpoint file exists (i.e. a run is in progress)
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Writes `{ remaining_urls: urls, completed_count: 0 }` only if no
    /// checkpoint exists yet, then returns the current checkpoint either way
    pub fn initialize_if_absent(&self, urls: &[String]) -> Result<ParseCheckpoint> {
        if !self.exists() {
            let checkpoint = ParseCheckpoint {
                remaining_urls: urls.to_vec(),
                completed_count: 0,
            };
            self.persist(&checkpoint)?;
        }
        self.load()
    }

    /// Loads the checkpoint
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScrapeError::CheckpointCorruption`] when the file is
    /// missing, unparseable, or lists the same URL twice.
    pub fn load(&self) -> Result<ParseCheckpoint> {
        if !self.exists() {
            return Err(corruption(&self.path, "checkpoint file does not exist"));
        }

        let content = std::fs::read_to_string(&self.path)?;
        let checkpoint: ParseCheckpoint = serde_json::from_str(&content)
            .map_err(|e| corruption(&self.path, format!("unparseable JSON: {e}")))?;

        let mut seen = HashSet::new();
        for url in &checkpoint.remaining_urls {
            if !seen.insert(url) {
                return Err(corruption(
                    &self.path,
                    format!("duplicate URL in remaining_urls: {url}"),
                ));
            }
        }

        Ok(checkpoint)
    }

    /// Marks one URL as handled: removes it from `remaining_urls` by
    /// identity, increments `completed_count`, and persists atomically
    ///
    /// # Errors
    ///
    /// Advancing a URL that is not in `remaining_urls` means the caller and
    /// the checkpoint disagree about the state of the run; that is reported
    /// as corruption rather than papered over.
    pub fn advance(&self, url: &str) -> Result<ParseCheckpoint> {
        let mut checkpoint = self.load()?;

        let position = checkpoint
            .remaining_urls
            .iter()
            .position(|candidate| candidate == url)
            .ok_or_else(|| {
                corruption(
                    &self.path,
                    format!("advance for URL not in remaining_urls: {url}"),
                )
            })?;

        checkpoint.remaining_urls.remove(position);
        checkpoint.completed_count += 1;
        self.persist(&checkpoint)?;
        Ok(checkpoint)
    }

    fn persist(&self, checkpoint: &ParseCheckpoint) -> Result<()> {
        let json = serde_json::to_string(checkpoint)?;
        write_atomic(&self.path, &json)
    }
}
