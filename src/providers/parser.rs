//! Parser capability traits consumed by the parsing pipeline

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::{Citation, DocumentSource, Section};

/// Raw extraction output from a single parser capability, before the
/// pipeline merges, enriches, and deduplicates it.
#[derive(Debug, Clone, Default)]
pub struct ParsedFragment {
    /// Full extracted text
    pub full_text: String,
    /// Structured sections, when the parser recovers them
    pub sections: Vec<Section>,
    /// Citations found by this parser
    pub citations: Vec<Citation>,
    /// Display equations found by this parser
    pub equations: Vec<String>,
}

/// Trait for full-text and structure extraction from a document source
///
/// The pipeline holds up to two implementations: a primary (high
/// fidelity, may be unavailable or fail) and a fallback (baseline
/// extraction that is expected to almost always succeed).
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Parse the source into a text/structure fragment
    ///
    /// Fails with [`crate::Error::ParseFailed`] when extraction is not
    /// possible for this source.
    async fn parse(&self, source: &DocumentSource) -> Result<ParsedFragment>;

    /// Get parser name for logging
    fn name(&self) -> &str;
}

/// Trait for specialized citation/reference extraction
///
/// Runs after the base parse and augments whatever citations the
/// document parser already found; its failure is never fatal for the
/// document.
#[async_trait]
pub trait CitationEnricher: Send + Sync {
    /// Extract citations from the source
    async fn extract(&self, source: &DocumentSource) -> Result<Vec<Citation>>;

    /// Get enricher name for logging
    fn name(&self) -> &str;
}
