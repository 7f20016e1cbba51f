//! Sequential, write-once checkpoint files for batch runs

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::Result;

/// One progress snapshot, serialized as a single JSON object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointSnapshot {
    /// Items processed so far
    pub processed: usize,
    /// Total items in the run
    pub total: usize,
    /// Successful items so far
    pub successful: usize,
    /// Failed items so far
    pub failed: usize,
    /// Human-readable completion percentage, e.g. "80.0%"
    pub progress: String,
}

impl CheckpointSnapshot {
    /// Build a snapshot, deriving the `progress` percentage string
    pub fn new(processed: usize, total: usize, successful: usize, failed: usize) -> Self {
        let percent = if total == 0 {
            100.0
        } else {
            processed as f64 / total as f64 * 100.0
        };
        Self {
            processed,
            total,
            successful,
            failed,
            progress: format!("{percent:.1}%"),
        }
    }
}

/// Writer producing `checkpoint_<n>.json` files under one directory
///
/// Files are numbered sequentially per writer and never modified after
/// creation. Each write goes to a temp file first and is renamed into
/// place, so a concurrent reader never observes a partial checkpoint.
#[derive(Debug)]
pub struct CheckpointWriter {
    dir: PathBuf,
    counter: AtomicUsize,
}

impl CheckpointWriter {
    /// Create a writer rooted at `dir` (created on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicUsize::new(0),
        }
    }

    /// Directory the writer targets
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the next checkpoint file and return its path
    pub async fn write(&self, snapshot: &CheckpointSnapshot) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self.dir.join(format!("checkpoint_{seq}.json"));
        let json = serde_json::to_vec_pretty(snapshot)?;

        let tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.as_file().write_all(&json)?;
        tmp.persist(&path).map_err(|e| e.error)?;

        tracing::info!(
            "checkpoint saved: {} ({}/{}, {} ok, {} failed)",
            path.display(),
            snapshot.processed,
            snapshot.total,
            snapshot.successful,
            snapshot.failed
        );

        Ok(path)
    }
}
