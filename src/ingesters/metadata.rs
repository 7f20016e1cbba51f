//! Batch metadata fetching from an external catalog

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::BatchConfig;
use crate::error::Result;
use crate::processing::BatchProcessor;
use crate::providers::MetadataProvider;
use crate::types::batch::BatchResult;
use crate::types::document::PaperMetadata;

/// Fetches metadata records for document ids in batches
pub struct MetadataBatchFetcher {
    client: Arc<dyn MetadataProvider>,
    processor: BatchProcessor,
}

impl MetadataBatchFetcher {
    /// Create a fetcher with the metadata-tuned default configuration
    pub fn new(client: Arc<dyn MetadataProvider>) -> Self {
        Self::with_config(client, BatchConfig::for_metadata_fetch())
    }

    /// Create a fetcher with an explicit configuration
    pub fn with_config(client: Arc<dyn MetadataProvider>, config: BatchConfig) -> Self {
        Self {
            client,
            processor: BatchProcessor::new(config),
        }
    }

    /// Fetch metadata for every id, optionally writing the collected
    /// records as one JSON array
    ///
    /// An id the catalog does not know is a success that contributes no
    /// record. Fails only when the aggregate output file cannot be
    /// written.
    pub async fn fetch_metadata(
        &self,
        ids: Vec<String>,
        output_file: Option<&Path>,
    ) -> Result<BatchResult<String>> {
        // operations complete concurrently, so the collection is locked
        let records: Mutex<Vec<PaperMetadata>> = Mutex::new(Vec::new());
        let client = &self.client;

        let result = self
            .processor
            .process_items(
                ids,
                |id| {
                    let records = &records;
                    async move {
                        match client.fetch(&id).await? {
                            Some(record) => records.lock().unwrap().push(record),
                            None => tracing::debug!("[{}] no catalog record, skipping", id),
                        }
                        Ok(())
                    }
                },
                &format!("Fetching from {}", self.client.name()),
            )
            .await;

        let records = records.into_inner().unwrap();
        tracing::info!(
            "metadata fetch complete: {}/{} ok, {} records",
            result.successful,
            result.total,
            records.len()
        );

        if let Some(path) = output_file {
            if !records.is_empty() {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                let json = serde_json::to_vec_pretty(&records)?;
                tokio::fs::write(path, json).await?;
                tracing::info!("saved {} records to {}", records.len(), path.display());
            }
        }

        Ok(result)
    }
}
