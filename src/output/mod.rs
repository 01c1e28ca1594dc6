//! Article output
//!
//! One text file per article, named by its sequence number, inside the
//! source's bucket directory. Files carry the body text only, no metadata,
//! and are never rewritten: sequence numbers keep increasing across resumed
//! runs.

use crate::Result;
use std::path::{Path, PathBuf};

/// Writes article bodies under a root directory, one bucket per source
#[derive(Debug, Clone)]
pub struct ArticleWriter {
    root: PathBuf,
}

impl ArticleWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes one article, creating the bucket directory on first use,
    /// and returns the file path
    pub fn write(&self, bucket: &str, sequence: usize, body: &str) -> Result<PathBuf> {
        let bucket_dir = self.root.join(bucket);
        std::fs::create_dir_all(&bucket_dir)?;

        let path = bucket_dir.join(format!("{sequence}.txt"));
        std::fs::write(&path, body)?;
        Ok(path)
    }

    /// Path an article would be written to, without writing it
    pub fn article_path(&self, bucket: &str, sequence: usize) -> PathBuf {
        self.root.join(bucket).join(format!("{sequence}.txt"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
