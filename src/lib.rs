//! litgraph-ingest: batch-ingestion core for a research-paper knowledge graph
//!
//! This crate provides a generic, concurrency-bounded batch engine with
//! retry and resumable checkpointing, and a multi-stage document parsing
//! pipeline with parser fallback, citation enrichment, and quality
//! scoring. Parsers, stores, and metadata catalogs are external
//! collaborators injected through the traits in [`providers`].

pub mod config;
pub mod error;
pub mod ingesters;
pub mod ingestion;
pub mod processing;
pub mod providers;
pub mod types;

pub use config::{BatchConfig, PipelineConfig, RetryPolicy};
pub use error::{Error, Result};
pub use ingesters::{IngestReport, MetadataBatchFetcher, PdfBatchParser, StoreBatchIngester};
pub use ingestion::{EntityExtractor, ParsingPipeline};
pub use processing::{BatchProcessor, ProgressSink};
pub use types::{
    batch::BatchResult,
    document::{Citation, DocumentSource, PaperMetadata, ParsedDocument, ParserKind, Section},
    quality::ParsingQuality,
};
