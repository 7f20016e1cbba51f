//! Provider abstractions for parser capabilities and storage collaborators
//!
//! This module provides trait-based abstractions for everything the
//! ingestion core calls out to: PDF/reference parsers, graph and vector
//! stores, and metadata services. Implementations live out of crate and
//! are injected into the pipeline and the specializations; nothing here
//! reaches into process-wide singletons.

pub mod graph_store;
pub mod metadata;
pub mod parser;
pub mod vector_store;

pub use graph_store::GraphStore;
pub use metadata::MetadataProvider;
pub use parser::{CitationEnricher, DocumentParser, ParsedFragment};
pub use vector_store::VectorStore;
