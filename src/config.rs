//! Configuration for batch processing and the parsing pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Retry policy applied by the batch engine to transient failures
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts per item, including the first (minimum 1)
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds; doubled after each failed attempt
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
        }
    }
}

impl RetryPolicy {
    /// Backoff before the retry that follows failed attempt `attempt`
    /// (counted from 0): `base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

/// Configuration for batch processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of items per chunk; a chunk fully completes before the next starts
    pub batch_size: usize,
    /// Maximum concurrent operations in flight at any instant
    pub max_concurrent: usize,
    /// Retry policy for transient per-item failures
    pub retry: RetryPolicy,
    /// Write a checkpoint every N processed items (chunk-aligned)
    pub checkpoint_interval: usize,
    /// Directory for checkpoint files; checkpointing is disabled when unset
    pub checkpoint_dir: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_concurrent: 10,
            retry: RetryPolicy::default(),
            checkpoint_interval: 500,
            checkpoint_dir: None,
        }
    }
}

impl BatchConfig {
    /// Preset tuned for graph/vector store writes
    pub fn for_store_ingest() -> Self {
        Self {
            batch_size: 50,
            max_concurrent: 5,
            checkpoint_interval: 250,
            ..Self::default()
        }
    }

    /// Preset tuned for PDF parsing (heavier per-item work)
    pub fn for_pdf_parsing() -> Self {
        Self {
            batch_size: 20,
            max_concurrent: 3,
            checkpoint_interval: 100,
            ..Self::default()
        }
    }

    /// Preset tuned for lightweight metadata fetches
    pub fn for_metadata_fetch() -> Self {
        Self {
            batch_size: 10,
            max_concurrent: 5.min(num_cpus::get()),
            ..Self::default()
        }
    }
}

/// Configuration for the parsing pipeline stages
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Attempt the primary parser
    pub use_primary: bool,
    /// Fall back to the secondary parser when the primary fails or is absent
    pub use_fallback: bool,
    /// Run citation enrichment after a successful parse
    pub enrich_citations: bool,
    /// Run the local structural-entity pass over the full text
    pub extract_entities: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            use_primary: true,
            use_fallback: true,
            enrich_citations: true,
            extract_entities: true,
        }
    }
}
