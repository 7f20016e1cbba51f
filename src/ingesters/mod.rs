//! Thin batch-engine specializations
//!
//! Each specialization binds a tuned [`crate::config::BatchConfig`] and
//! one per-item operation to injected collaborators, then delegates to
//! [`crate::processing::BatchProcessor`]. No control flow beyond that
//! lives here.

pub mod metadata;
pub mod pdf;
pub mod store;

pub use metadata::MetadataBatchFetcher;
pub use pdf::PdfBatchParser;
pub use store::{IngestReport, StoreBatchIngester};
