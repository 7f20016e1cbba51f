//! Vector store collaborator trait for indexing parsed documents

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::ParsedDocument;

/// Trait for indexing parsed documents in a vector store
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Index one document for similarity search
    async fn index_document(&self, doc: &ParsedDocument) -> Result<()>;

    /// Get store name for logging
    fn name(&self) -> &str;
}
