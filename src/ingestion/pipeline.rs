//! Multi-parser pipeline producing a merged document and a quality record

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::ingestion::dedup::{merge_citations, merge_equations};
use crate::ingestion::entities::EntityExtractor;
use crate::providers::parser::{CitationEnricher, DocumentParser, ParsedFragment};
use crate::types::document::{DocumentSource, ParsedDocument, ParserKind};
use crate::types::quality::ParsingQuality;

/// Confidence when the primary parser produced the base extraction
const PRIMARY_CONFIDENCE: f32 = 0.9;
/// Confidence when the fallback parser produced the base extraction
const FALLBACK_CONFIDENCE: f32 = 0.6;

/// Orchestrates parser capabilities in a fixed fallback order
///
/// Stage order per document: primary parse, fallback parse (only when
/// the primary failed or is absent), citation enrichment, local
/// structural-entity pass. Enrichment and the entity pass run on
/// whichever base extraction succeeded; their failures downgrade to
/// warnings. Only a full parser wipeout fails the document.
pub struct ParsingPipeline {
    primary: Option<Arc<dyn DocumentParser>>,
    fallback: Option<Arc<dyn DocumentParser>>,
    enricher: Option<Arc<dyn CitationEnricher>>,
    entities: EntityExtractor,
    config: PipelineConfig,
}

impl ParsingPipeline {
    /// Create a pipeline with no collaborators attached
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            primary: None,
            fallback: None,
            enricher: None,
            entities: EntityExtractor::new(),
            config,
        }
    }

    /// Attach the primary (high-fidelity) parser
    pub fn with_primary(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.primary = Some(parser);
        self
    }

    /// Attach the fallback (baseline) parser
    pub fn with_fallback(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.fallback = Some(parser);
        self
    }

    /// Attach the citation enricher
    pub fn with_enricher(mut self, enricher: Arc<dyn CitationEnricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    /// Parse one source into a merged document plus its quality record
    ///
    /// Fails with [`Error::NoParserSucceeded`] only when every enabled
    /// parser capability fails; that is fatal for this document, not for
    /// a batch it runs in.
    pub async fn parse(
        &self,
        source: &DocumentSource,
    ) -> Result<(ParsedDocument, ParsingQuality)> {
        let start = Instant::now();
        let mut warnings: Vec<String> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        let mut primary_success = false;
        let mut fallback_used = false;
        let mut citation_enrichment_success = false;

        tracing::info!("[{}] starting parse pipeline", source.id);

        let mut fragment: Option<ParsedFragment> = None;

        if self.config.use_primary {
            if let Some(parser) = &self.primary {
                tracing::info!("[{}] attempting {} parse", source.id, parser.name());
                match parser.parse(source).await {
                    Ok(parsed) => {
                        primary_success = true;
                        fragment = Some(parsed);
                        tracing::info!("[{}] {} parse succeeded", source.id, parser.name());
                    }
                    Err(e) => {
                        tracing::error!("[{}] {} parse failed: {}", source.id, parser.name(), e);
                        errors.push(format!("{} failed: {e}", parser.name()));
                    }
                }
            }
        }

        if fragment.is_none() && self.config.use_fallback {
            if let Some(parser) = &self.fallback {
                tracing::info!("[{}] attempting {} parse", source.id, parser.name());
                match parser.parse(source).await {
                    Ok(parsed) => {
                        fallback_used = true;
                        fragment = Some(parsed);
                        warnings.push("fallback parser used (lower quality)".to_string());
                        tracing::info!("[{}] {} parse succeeded", source.id, parser.name());
                    }
                    Err(e) => {
                        tracing::error!("[{}] {} parse failed: {}", source.id, parser.name(), e);
                        errors.push(format!("{} failed: {e}", parser.name()));
                    }
                }
            }
        }

        let Some(fragment) = fragment else {
            return Err(Error::NoParserSucceeded {
                document_id: source.id.clone(),
            });
        };

        let (parser_used, confidence) = if fallback_used {
            (ParserKind::Fallback, FALLBACK_CONFIDENCE)
        } else {
            (ParserKind::Primary, PRIMARY_CONFIDENCE)
        };

        let mut document = ParsedDocument {
            id: source.id.clone(),
            title: source.title.clone(),
            abstract_text: source.abstract_text.clone(),
            authors: source.authors.clone(),
            categories: source.categories.clone(),
            full_text: fragment.full_text,
            sections: fragment.sections,
            citations: merge_citations(fragment.citations, Vec::new()),
            equations: Vec::new(),
            parser_used,
            confidence,
            parsed_at: Utc::now(),
        };
        merge_equations(&mut document.equations, fragment.equations);

        if self.config.enrich_citations {
            if let Some(enricher) = &self.enricher {
                tracing::info!("[{}] attempting {} enrichment", source.id, enricher.name());
                match enricher.extract(source).await {
                    Ok(citations) => {
                        citation_enrichment_success = true;
                        let before = document.citations.len();
                        document.citations =
                            merge_citations(std::mem::take(&mut document.citations), citations);
                        tracing::info!(
                            "[{}] enrichment merged {} -> {} citations",
                            source.id,
                            before,
                            document.citations.len()
                        );
                    }
                    Err(e) => {
                        tracing::warn!("[{}] {} failed: {}", source.id, enricher.name(), e);
                        warnings.push(format!("citation enrichment failed: {e}"));
                    }
                }
            }
        }

        if self.config.extract_entities {
            let found = self.entities.extract_all(&document.full_text);
            merge_equations(
                &mut document.equations,
                found
                    .display_equations
                    .into_iter()
                    .map(|entity| entity.content)
                    .collect(),
            );
        }

        let quality = ParsingQuality {
            document_id: source.id.clone(),
            primary_success,
            fallback_used,
            citation_enrichment_success,
            section_count: document.sections.len(),
            equation_count: document.equations.len(),
            citation_count: document.citations.len(),
            elapsed_seconds: start.elapsed().as_secs_f64(),
            warnings,
            errors,
        };

        tracing::info!(
            "[{}] parse complete via {} in {:.2}s: {} sections, {} equations, {} citations",
            source.id,
            parser_used,
            quality.elapsed_seconds,
            quality.section_count,
            quality.equation_count,
            quality.citation_count
        );

        Ok((document, quality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::types::document::Citation;

    fn source() -> DocumentSource {
        DocumentSource {
            id: "2401.12345".to_string(),
            title: "A Paper".to_string(),
            abstract_text: "An abstract.".to_string(),
            authors: vec!["A. Author".to_string()],
            categories: vec!["cs.CL".to_string()],
            pdf_path: None,
        }
    }

    struct StubParser {
        name: &'static str,
        fragment: Option<ParsedFragment>,
        calls: AtomicUsize,
    }

    impl StubParser {
        fn succeeding(name: &'static str, fragment: ParsedFragment) -> Self {
            Self {
                name,
                fragment: Some(fragment),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                fragment: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DocumentParser for StubParser {
        async fn parse(&self, _source: &DocumentSource) -> Result<ParsedFragment> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fragment {
                Some(fragment) => Ok(fragment.clone()),
                None => Err(Error::parse_failed(self.name, "engine crashed")),
            }
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    struct StubEnricher {
        citations: Option<Vec<Citation>>,
    }

    #[async_trait]
    impl CitationEnricher for StubEnricher {
        async fn extract(&self, _source: &DocumentSource) -> Result<Vec<Citation>> {
            match &self.citations {
                Some(citations) => Ok(citations.clone()),
                None => Err(Error::enrichment_failed("service unavailable")),
            }
        }

        fn name(&self) -> &str {
            "stub-enricher"
        }
    }

    fn fragment_with_text(text: &str) -> ParsedFragment {
        ParsedFragment {
            full_text: text.to_string(),
            ..ParsedFragment::default()
        }
    }

    #[tokio::test]
    async fn primary_success_sets_high_confidence() {
        let pipeline = ParsingPipeline::new(PipelineConfig::default())
            .with_primary(Arc::new(StubParser::succeeding(
                "primary",
                fragment_with_text("plain text"),
            )))
            .with_fallback(Arc::new(StubParser::failing("fallback")));

        let (document, quality) = pipeline.parse(&source()).await.unwrap();

        assert_eq!(document.parser_used, ParserKind::Primary);
        assert!((document.confidence - 0.9).abs() < f32::EPSILON);
        assert!(quality.primary_success);
        assert!(!quality.fallback_used);
        assert!(quality.warnings.is_empty());
    }

    #[tokio::test]
    async fn fallback_used_when_primary_fails() {
        let pipeline = ParsingPipeline::new(PipelineConfig::default())
            .with_primary(Arc::new(StubParser::failing("primary")))
            .with_fallback(Arc::new(StubParser::succeeding(
                "fallback",
                fragment_with_text("recovered text"),
            )));

        let (document, quality) = pipeline.parse(&source()).await.unwrap();

        assert_eq!(document.parser_used, ParserKind::Fallback);
        assert!((document.confidence - 0.6).abs() < f32::EPSILON);
        assert!(!quality.primary_success);
        assert!(quality.fallback_used);
        assert!(quality
            .warnings
            .iter()
            .any(|w| w.contains("fallback parser used")));
        assert_eq!(quality.errors.len(), 1);
    }

    #[tokio::test]
    async fn all_parsers_failing_is_fatal_for_document() {
        let pipeline = ParsingPipeline::new(PipelineConfig::default())
            .with_primary(Arc::new(StubParser::failing("primary")))
            .with_fallback(Arc::new(StubParser::failing("fallback")));

        let err = pipeline.parse(&source()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::NoParserSucceeded { document_id } if document_id == "2401.12345"
        ));
    }

    #[tokio::test]
    async fn no_parsers_configured_is_fatal() {
        let pipeline = ParsingPipeline::new(PipelineConfig::default());
        let err = pipeline.parse(&source()).await.unwrap_err();
        assert!(matches!(err, Error::NoParserSucceeded { .. }));
    }

    #[tokio::test]
    async fn disabled_primary_goes_straight_to_fallback() {
        let primary = Arc::new(StubParser::succeeding(
            "primary",
            fragment_with_text("unused"),
        ));
        let pipeline = ParsingPipeline::new(PipelineConfig {
            use_primary: false,
            ..PipelineConfig::default()
        })
        .with_primary(Arc::clone(&primary) as Arc<dyn DocumentParser>)
        .with_fallback(Arc::new(StubParser::succeeding(
            "fallback",
            fragment_with_text("used"),
        )));

        let (document, _) = pipeline.parse(&source()).await.unwrap();

        assert_eq!(primary.calls.load(Ordering::SeqCst), 0);
        assert_eq!(document.parser_used, ParserKind::Fallback);
        assert_eq!(document.full_text, "used");
    }

    #[tokio::test]
    async fn enrichment_merges_and_dedups_citations() {
        let parser_citation = Citation {
            raw_text: "[1] Smith et al. 2020".to_string(),
            external_id: Some("2001.00001".to_string()),
            doi: None,
            context: "cited once".to_string(),
        };
        let enricher_same = Citation {
            raw_text: "Smith, J. and others (2020)".to_string(),
            external_id: Some("2001.00001".to_string()),
            doi: None,
            context: "a considerably longer context sentence".to_string(),
        };
        let enricher_new = Citation {
            raw_text: "[2] Jones 2021".to_string(),
            external_id: None,
            doi: Some("10.1000/182".to_string()),
            context: String::new(),
        };

        let fragment = ParsedFragment {
            full_text: "text".to_string(),
            citations: vec![parser_citation],
            ..ParsedFragment::default()
        };
        let pipeline = ParsingPipeline::new(PipelineConfig::default())
            .with_primary(Arc::new(StubParser::succeeding("primary", fragment)))
            .with_enricher(Arc::new(StubEnricher {
                citations: Some(vec![enricher_same, enricher_new]),
            }));

        let (document, quality) = pipeline.parse(&source()).await.unwrap();

        assert!(quality.citation_enrichment_success);
        assert_eq!(document.citations.len(), 2);
        // richer enricher record won the shared reference
        assert_eq!(
            document.citations[0].context,
            "a considerably longer context sentence"
        );
        assert_eq!(quality.citation_count, 2);
    }

    #[tokio::test]
    async fn enrichment_failure_keeps_existing_citations() {
        let fragment = ParsedFragment {
            full_text: "text".to_string(),
            citations: vec![Citation {
                raw_text: "[1] Smith 2020".to_string(),
                external_id: None,
                doi: None,
                context: String::new(),
            }],
            ..ParsedFragment::default()
        };
        let pipeline = ParsingPipeline::new(PipelineConfig::default())
            .with_primary(Arc::new(StubParser::succeeding("primary", fragment)))
            .with_enricher(Arc::new(StubEnricher { citations: None }));

        let (document, quality) = pipeline.parse(&source()).await.unwrap();

        assert!(!quality.citation_enrichment_success);
        assert_eq!(document.citations.len(), 1);
        assert!(quality
            .warnings
            .iter()
            .any(|w| w.contains("citation enrichment failed")));
    }

    #[tokio::test]
    async fn entity_pass_merges_display_equations() {
        let fragment = ParsedFragment {
            full_text: "Intro $$E = mc^2$$ and $$F = ma$$ end".to_string(),
            equations: vec!["E = mc^2".to_string()],
            ..ParsedFragment::default()
        };
        let pipeline = ParsingPipeline::new(PipelineConfig::default())
            .with_primary(Arc::new(StubParser::succeeding("primary", fragment)));

        let (document, quality) = pipeline.parse(&source()).await.unwrap();

        // parser equation kept once, entity pass contributed the second
        assert_eq!(document.equations.len(), 2);
        assert!(document.equations.contains(&"F = ma".to_string()));
        assert_eq!(quality.equation_count, 2);
    }

    #[tokio::test]
    async fn entity_pass_can_be_disabled() {
        let fragment = fragment_with_text("Has $$x + y$$ inside");
        let pipeline = ParsingPipeline::new(PipelineConfig {
            extract_entities: false,
            ..PipelineConfig::default()
        })
        .with_primary(Arc::new(StubParser::succeeding("primary", fragment)));

        let (document, _) = pipeline.parse(&source()).await.unwrap();
        assert!(document.equations.is_empty());
    }
}
