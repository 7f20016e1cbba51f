//! Graph store collaborator trait for persisting parsed documents

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::ParsedDocument;

/// Trait for writing parsed documents into a knowledge graph
///
/// Connection lifecycle belongs to the implementation's owner; the
/// ingester only sees the write operation.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Write one document, optionally with its citation edges
    async fn ingest_document(&self, doc: &ParsedDocument, include_citations: bool) -> Result<()>;

    /// Get store name for logging
    fn name(&self) -> &str;
}
