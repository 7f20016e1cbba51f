//! Document parsing pipeline: parser fallback, citation enrichment,
//! and local structural-entity extraction

pub mod dedup;
pub mod entities;
pub mod pipeline;

pub use entities::{EntityExtractor, ExtractedEntities, MathEntity, MathEntityKind};
pub use pipeline::ParsingPipeline;
