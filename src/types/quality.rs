//! Per-document parsing audit record

use serde::{Deserialize, Serialize};

/// Quality record for one pipeline run, created alongside the parsed
/// document and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingQuality {
    /// Document the record belongs to
    pub document_id: String,
    /// The primary parser produced the base extraction
    pub primary_success: bool,
    /// The fallback parser was used
    pub fallback_used: bool,
    /// Citation enrichment succeeded
    pub citation_enrichment_success: bool,
    /// Sections in the final document
    pub section_count: usize,
    /// Equations in the final document
    pub equation_count: usize,
    /// Citations in the final document (after dedup)
    pub citation_count: usize,
    /// Wall-clock seconds from first parser attempt to end of entity pass
    pub elapsed_seconds: f64,
    /// Non-fatal issues (fallback used, enrichment failed, ...)
    pub warnings: Vec<String>,
    /// Stage errors that did not abort the parse
    pub errors: Vec<String>,
}
