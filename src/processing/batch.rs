//! Generic async batch processor
//!
//! Runs a caller-supplied per-item operation over a list of items in
//! consecutive chunks, with a counting semaphore bounding how many
//! operations are in flight at once. Transient failures are retried
//! with exponential backoff; an item that exhausts its attempts is
//! recorded in the result and never aborts the batch.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::config::BatchConfig;
use crate::error::{Error, Result};
use crate::processing::checkpoint::{CheckpointSnapshot, CheckpointWriter};
use crate::processing::progress::{ProgressSink, TracingProgress};
use crate::types::batch::BatchResult;

/// Async batch processor with bounded concurrency and checkpointing
///
/// The engine offers at-least-once-per-attempt semantics: operations
/// must be idempotent under retry. Accumulator state is touched only by
/// the coordinating task after each chunk has fully joined, so no locks
/// guard the result.
pub struct BatchProcessor {
    config: BatchConfig,
    cancel: CancellationToken,
    progress: Arc<dyn ProgressSink>,
    checkpoints: Option<CheckpointWriter>,
}

impl BatchProcessor {
    /// Create a processor from a batch configuration
    pub fn new(config: BatchConfig) -> Self {
        let checkpoints = config.checkpoint_dir.clone().map(CheckpointWriter::new);
        Self {
            config,
            cancel: CancellationToken::new(),
            progress: Arc::new(TracingProgress),
            checkpoints,
        }
    }

    /// Use an external cancellation token
    ///
    /// Cancellation is cooperative: it is checked at each chunk
    /// boundary, and an in-flight chunk drains before the engine stops
    /// admitting work.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Replace the default tracing progress sink
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// The configuration this processor runs with
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process items in chunks with progress tracking
    ///
    /// Per-item failures are captured into the returned
    /// [`BatchResult`]; this method itself never fails. Items not yet
    /// admitted when the batch is cancelled are recorded as failed with
    /// [`Error::Cancelled`], preserving `successful + failed == total`.
    ///
    /// The engine imposes no per-operation deadline; callers that need
    /// one wrap the body of `operation` in `tokio::time::timeout`.
    pub async fn process_items<T, R, F, Fut>(
        &self,
        items: Vec<T>,
        operation: F,
        description: &str,
    ) -> BatchResult<T>
    where
        T: Clone + fmt::Debug,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let total = items.len();
        if total == 0 {
            return BatchResult::empty();
        }

        let batch_size = self.config.batch_size.max(1);
        let max_concurrent = self.config.max_concurrent.max(1);
        let checkpoint_interval = self.config.checkpoint_interval.max(1);

        tracing::info!(
            "{}: {} items in chunks of {}, {} concurrent",
            description,
            total,
            batch_size,
            max_concurrent
        );

        let semaphore = Semaphore::new(max_concurrent);
        let mut result = BatchResult {
            total,
            successful: 0,
            failed: 0,
            errors: Vec::new(),
            checkpoints: Vec::new(),
        };

        let mut remaining = items.into_iter();
        let mut processed = 0usize;

        loop {
            let chunk: Vec<T> = remaining.by_ref().take(batch_size).collect();
            if chunk.is_empty() {
                break;
            }

            if self.cancel.is_cancelled() {
                tracing::warn!(
                    "{}: cancelled after {}/{} items",
                    description,
                    processed,
                    total
                );
                for item in chunk.into_iter().chain(remaining.by_ref()) {
                    result.failed += 1;
                    result.errors.push((item, Error::Cancelled));
                }
                break;
            }

            let attempts = chunk
                .into_iter()
                .map(|item| self.run_item(item, &operation, &semaphore));
            let outcomes = join_all(attempts).await;

            for (item, outcome) in outcomes {
                processed += 1;
                match outcome {
                    Ok(_) => result.successful += 1,
                    Err(error) => {
                        result.failed += 1;
                        result.errors.push((item, error));
                    }
                }
            }

            self.progress.on_progress(processed, total, description);

            if let Some(writer) = &self.checkpoints {
                if processed % checkpoint_interval == 0 {
                    let snapshot = CheckpointSnapshot::new(
                        processed,
                        total,
                        result.successful,
                        result.failed,
                    );
                    match writer.write(&snapshot).await {
                        Ok(path) => result.checkpoints.push(path),
                        Err(e) => {
                            // a failed checkpoint must not fail the batch
                            tracing::warn!("{}: checkpoint write failed: {}", description, e);
                        }
                    }
                }
            }
        }

        tracing::info!(
            "{}: complete, {} ok / {} failed of {}",
            description,
            result.successful,
            result.failed,
            result.total
        );

        result
    }

    /// Run one item to a terminal state: success, exhausted retries, or
    /// a permanent failure on the first attempt.
    ///
    /// The semaphore permit is held only while the operation runs and is
    /// released before the backoff sleep, so a slot frees up while an
    /// item waits to retry.
    async fn run_item<T, R, F, Fut>(
        &self,
        item: T,
        operation: &F,
        semaphore: &Semaphore,
    ) -> (T, Result<R>)
    where
        T: Clone + fmt::Debug,
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let max_attempts = self.config.retry.max_attempts.max(1);
        let mut attempt = 0u32;

        loop {
            let outcome = {
                let _permit = semaphore.acquire().await.unwrap();
                operation(item.clone()).await
            };

            match outcome {
                Ok(value) => return (item, Ok(value)),
                Err(error) if attempt + 1 < max_attempts && error.is_transient() => {
                    let delay = self.config.retry.delay_for(attempt);
                    tracing::warn!(
                        "item {:?} failed on attempt {} ({}), retrying in {:?}",
                        item,
                        attempt + 1,
                        error,
                        delay
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    tracing::error!(
                        "item {:?} failed after {} attempt(s): {}",
                        item,
                        attempt + 1,
                        error
                    );
                    return (item, Err(error));
                }
            }
        }
    }
}
