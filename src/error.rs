//! Error types for the ingestion core
//!
//! Failures are split into transient (worth retrying) and permanent
//! (retrying cannot help) classes; the batch engine consults
//! [`Error::is_transient`] before scheduling a retry.

use thiserror::Error;

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ingestion core errors
#[derive(Debug, Error)]
pub enum Error {
    /// Transient I/O or service failure, expected to succeed on retry
    #[error("transient failure: {0}")]
    Transient(String),

    /// Permanent failure (malformed input, unsupported data)
    #[error("permanent failure: {0}")]
    Permanent(String),

    /// A parser capability failed for one document
    #[error("parser '{parser}' failed: {message}")]
    ParseFailed { parser: String, message: String },

    /// Citation enrichment failed
    #[error("citation enrichment failed: {0}")]
    EnrichmentFailed(String),

    /// Every configured parser failed for one document
    #[error("no parser succeeded for '{document_id}'")]
    NoParserSucceeded { document_id: String },

    /// The batch was cancelled before this item ran
    #[error("batch cancelled before item was processed")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a transient error
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient(message.into())
    }

    /// Create a permanent error
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::Permanent(message.into())
    }

    /// Create a parse failure for a named parser capability
    pub fn parse_failed(parser: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseFailed {
            parser: parser.into(),
            message: message.into(),
        }
    }

    /// Create an enrichment failure
    pub fn enrichment_failed(message: impl Into<String>) -> Self {
        Self::EnrichmentFailed(message.into())
    }

    /// Whether the batch engine should retry an operation that returned this error.
    ///
    /// IO errors are treated as transient except when the disk is full;
    /// parse and enrichment failures are permanent for the engine (the
    /// pipeline already ran its own fallback chain).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transient(_) => true,
            Self::Io(e) => e.kind() != std::io::ErrorKind::StorageFull,
            Self::Permanent(_)
            | Self::ParseFailed { .. }
            | Self::EnrichmentFailed(_)
            | Self::NoParserSucceeded { .. }
            | Self::Cancelled
            | Self::Json(_) => false,
        }
    }
}
