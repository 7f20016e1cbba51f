//! Data model for parsed documents, batch results, and quality records

pub mod batch;
pub mod document;
pub mod quality;

pub use batch::BatchResult;
pub use document::{
    Citation, DocumentSource, PaperMetadata, ParsedDocument, ParserKind, Section,
};
pub use quality::ParsingQuality;
