//! Document types produced and consumed by the parsing pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of leading characters of `raw_text` that participate in the
/// citation dedup key.
pub const CITATION_KEY_PREFIX: usize = 50;

/// Which parser capability produced a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// Full-fidelity primary parser
    Primary,
    /// Baseline fallback parser (lower quality)
    Fallback,
}

impl std::fmt::Display for ParserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A section of a parsed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading
    pub title: String,
    /// Section body text
    pub content: String,
    /// Heading level (1-6)
    pub level: u8,
    /// Equations found within this section
    #[serde(default)]
    pub equations: Vec<String>,
}

/// A citation reference extracted from a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Raw reference string as it appeared in the source
    pub raw_text: String,
    /// External identifier (e.g. an arXiv id), when resolved
    pub external_id: Option<String>,
    /// DOI, when resolved
    pub doi: Option<String>,
    /// Surrounding sentence
    #[serde(default)]
    pub context: String,
}

impl Citation {
    /// Dedup key: `(external_id, doi, raw_text[..50])`.
    ///
    /// The prefix is counted in characters, not bytes, so multi-byte
    /// author names do not split a codepoint.
    pub fn dedup_key(&self) -> (Option<&str>, Option<&str>, String) {
        let prefix: String = self.raw_text.chars().take(CITATION_KEY_PREFIX).collect();
        (self.external_id.as_deref(), self.doi.as_deref(), prefix)
    }
}

/// Input to the parsing pipeline: source metadata plus the file to parse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSource {
    /// Document identifier (e.g. "2401.12345")
    pub id: String,
    /// Title from upstream metadata
    pub title: String,
    /// Abstract from upstream metadata
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Author names
    pub authors: Vec<String>,
    /// Subject categories
    pub categories: Vec<String>,
    /// Path to the PDF on disk, when downloaded
    pub pdf_path: Option<PathBuf>,
}

/// A document with fully extracted and structured content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Document identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Abstract
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Author names
    pub authors: Vec<String>,
    /// Subject categories
    pub categories: Vec<String>,
    /// Full extracted text
    pub full_text: String,
    /// Structured sections
    #[serde(default)]
    pub sections: Vec<Section>,
    /// Citations, deduplicated by [`Citation::dedup_key`]
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// Display equations, deduplicated on exact string match
    #[serde(default)]
    pub equations: Vec<String>,
    /// Which parser produced the base extraction
    pub parser_used: ParserKind,
    /// Extraction confidence in [0, 1]
    pub confidence: f32,
    /// When parsing completed
    pub parsed_at: DateTime<Utc>,
}

/// Metadata record returned by a metadata-fetch collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperMetadata {
    /// Document identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Abstract
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Author names
    pub authors: Vec<String>,
    /// Subject categories
    pub categories: Vec<String>,
    /// DOI, when known
    pub doi: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> ParsedDocument {
        ParsedDocument {
            id: "2401.12345".to_string(),
            title: "On Test Fixtures".to_string(),
            abstract_text: "We construct a fixture.".to_string(),
            authors: vec!["A. Author".to_string(), "B. Author".to_string()],
            categories: vec!["hep-th".to_string()],
            full_text: "Full text with $$E = mc^2$$ inside.".to_string(),
            sections: vec![Section {
                title: "Introduction".to_string(),
                content: "Intro text".to_string(),
                level: 1,
                equations: vec![],
            }],
            citations: vec![Citation {
                raw_text: "[1] A. Author, On Priors, 2020".to_string(),
                external_id: Some("2001.00001".to_string()),
                doi: None,
                context: "as shown in [1]".to_string(),
            }],
            equations: vec!["E = mc^2".to_string()],
            parser_used: ParserKind::Primary,
            confidence: 0.9,
            parsed_at: Utc::now(),
        }
    }

    #[test]
    fn document_round_trip() {
        let doc = sample_document();
        let json = serde_json::to_string(&doc).unwrap();
        let back: ParsedDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, doc.id);
        assert_eq!(back.title, doc.title);
        assert_eq!(back.abstract_text, doc.abstract_text);
        assert_eq!(back.authors, doc.authors);
        assert_eq!(back.categories, doc.categories);
        assert_eq!(back.full_text, doc.full_text);
        assert_eq!(back.sections, doc.sections);
        assert_eq!(back.citations, doc.citations);
        assert_eq!(back.equations, doc.equations);
        assert_eq!(back.parser_used, doc.parser_used);
        assert_eq!(back.confidence, doc.confidence);
        assert_eq!(back.parsed_at, doc.parsed_at);
    }

    #[test]
    fn abstract_field_renamed() {
        let doc = sample_document();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("abstract").is_some());
        assert!(json.get("abstract_text").is_none());
    }

    #[test]
    fn dedup_key_prefix_is_char_safe() {
        let citation = Citation {
            raw_text: "é".repeat(60),
            external_id: None,
            doi: None,
            context: String::new(),
        };
        let (_, _, prefix) = citation.dedup_key();
        assert_eq!(prefix.chars().count(), CITATION_KEY_PREFIX);
    }

    #[test]
    fn dedup_key_short_text() {
        let citation = Citation {
            raw_text: "short".to_string(),
            external_id: Some("x".to_string()),
            doi: None,
            context: String::new(),
        };
        let (ext, doi, prefix) = citation.dedup_key();
        assert_eq!(ext, Some("x"));
        assert_eq!(doi, None);
        assert_eq!(prefix, "short");
    }
}
