//! Metadata service collaborator trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::PaperMetadata;

/// Trait for fetching document metadata from an external catalog
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for one document id
    ///
    /// `Ok(None)` means the catalog has no record for this id; the
    /// fetcher treats that as a skip, not a failure.
    async fn fetch(&self, id: &str) -> Result<Option<PaperMetadata>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
