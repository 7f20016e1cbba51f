//! Batch ingestion of parsed documents into graph and vector stores

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::BatchConfig;
use crate::error::Error;
use crate::processing::BatchProcessor;
use crate::providers::{GraphStore, VectorStore};
use crate::types::batch::BatchResult;
use crate::types::document::ParsedDocument;

/// Per-store results of a combined ingest run
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Graph-store result, when that leg ran
    pub graph: Option<BatchResult<String>>,
    /// Vector-store result, when that leg ran
    pub vectors: Option<BatchResult<String>>,
}

/// Writes parsed documents to injected graph and vector stores in
/// batches, keyed by document id
pub struct StoreBatchIngester {
    graph: Arc<dyn GraphStore>,
    vectors: Arc<dyn VectorStore>,
    processor: BatchProcessor,
}

impl StoreBatchIngester {
    /// Create an ingester with the store-tuned default configuration
    pub fn new(graph: Arc<dyn GraphStore>, vectors: Arc<dyn VectorStore>) -> Self {
        Self::with_config(graph, vectors, BatchConfig::for_store_ingest())
    }

    /// Create an ingester with an explicit configuration
    pub fn with_config(
        graph: Arc<dyn GraphStore>,
        vectors: Arc<dyn VectorStore>,
        config: BatchConfig,
    ) -> Self {
        Self {
            graph,
            vectors,
            processor: BatchProcessor::new(config),
        }
    }

    /// Ingest documents into the graph store, with citation edges
    pub async fn ingest_to_graph(&self, documents: &[ParsedDocument]) -> BatchResult<String> {
        let by_id: HashMap<&str, &ParsedDocument> =
            documents.iter().map(|d| (d.id.as_str(), d)).collect();
        let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        let graph = &self.graph;

        let result = self
            .processor
            .process_items(
                ids,
                |id| {
                    let doc = by_id.get(id.as_str()).copied();
                    async move {
                        match doc {
                            Some(doc) => graph.ingest_document(doc, true).await,
                            None => Err(Error::permanent(format!("unknown document id '{id}'"))),
                        }
                    }
                },
                &format!("Ingesting to {}", self.graph.name()),
            )
            .await;

        tracing::info!(
            "graph ingest complete: {}/{} ok",
            result.successful,
            result.total
        );
        result
    }

    /// Index documents in the vector store
    pub async fn ingest_to_vectors(&self, documents: &[ParsedDocument]) -> BatchResult<String> {
        let by_id: HashMap<&str, &ParsedDocument> =
            documents.iter().map(|d| (d.id.as_str(), d)).collect();
        let ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
        let vectors = &self.vectors;

        let result = self
            .processor
            .process_items(
                ids,
                |id| {
                    let doc = by_id.get(id.as_str()).copied();
                    async move {
                        match doc {
                            Some(doc) => vectors.index_document(doc).await,
                            None => Err(Error::permanent(format!("unknown document id '{id}'"))),
                        }
                    }
                },
                &format!("Indexing in {}", self.vectors.name()),
            )
            .await;

        tracing::info!(
            "vector ingest complete: {}/{} ok",
            result.successful,
            result.total
        );
        result
    }

    /// Run both store legs sequentially, per the flags
    pub async fn ingest_full(
        &self,
        documents: &[ParsedDocument],
        to_graph: bool,
        to_vectors: bool,
    ) -> IngestReport {
        let mut report = IngestReport::default();

        if to_graph {
            tracing::info!("starting graph ingestion of {} documents", documents.len());
            report.graph = Some(self.ingest_to_graph(documents).await);
        }

        if to_vectors {
            tracing::info!("starting vector ingestion of {} documents", documents.len());
            report.vectors = Some(self.ingest_to_vectors(documents).await);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::Result;
    use crate::types::document::ParserKind;

    fn document(id: &str) -> ParsedDocument {
        ParsedDocument {
            id: id.to_string(),
            title: "T".to_string(),
            abstract_text: "A".to_string(),
            authors: vec![],
            categories: vec![],
            full_text: "text".to_string(),
            sections: vec![],
            citations: vec![],
            equations: vec![],
            parser_used: ParserKind::Primary,
            confidence: 0.9,
            parsed_at: Utc::now(),
        }
    }

    #[derive(Default)]
    struct RecordingGraph {
        writes: AtomicUsize,
        fail_id: Option<String>,
    }

    #[async_trait]
    impl GraphStore for RecordingGraph {
        async fn ingest_document(
            &self,
            doc: &ParsedDocument,
            _include_citations: bool,
        ) -> Result<()> {
            if self.fail_id.as_deref() == Some(doc.id.as_str()) {
                return Err(Error::permanent("constraint violation"));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "test-graph"
        }
    }

    #[derive(Default)]
    struct RecordingVectors {
        writes: AtomicUsize,
    }

    #[async_trait]
    impl VectorStore for RecordingVectors {
        async fn index_document(&self, _doc: &ParsedDocument) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "test-vectors"
        }
    }

    #[tokio::test]
    async fn graph_ingest_counts_and_writes() {
        let graph = Arc::new(RecordingGraph::default());
        let vectors = Arc::new(RecordingVectors::default());
        let ingester = StoreBatchIngester::new(
            Arc::clone(&graph) as Arc<dyn GraphStore>,
            Arc::clone(&vectors) as Arc<dyn VectorStore>,
        );

        let docs: Vec<_> = (0..7).map(|n| document(&format!("doc-{n}"))).collect();
        let result = ingester.ingest_to_graph(&docs).await;

        assert_eq!(result.total, 7);
        assert_eq!(result.successful, 7);
        assert_eq!(graph.writes.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn one_bad_document_reported_by_id() {
        let graph = Arc::new(RecordingGraph {
            writes: AtomicUsize::new(0),
            fail_id: Some("doc-2".to_string()),
        });
        let ingester = StoreBatchIngester::new(
            Arc::clone(&graph) as Arc<dyn GraphStore>,
            Arc::new(RecordingVectors::default()),
        );

        let docs: Vec<_> = (0..4).map(|n| document(&format!("doc-{n}"))).collect();
        let result = ingester.ingest_to_graph(&docs).await;

        assert_eq!(result.successful, 3);
        assert_eq!(result.failed, 1);
        assert_eq!(result.errors[0].0, "doc-2");
    }

    #[tokio::test]
    async fn full_ingest_respects_flags() {
        let graph = Arc::new(RecordingGraph::default());
        let vectors = Arc::new(RecordingVectors::default());
        let ingester = StoreBatchIngester::new(
            Arc::clone(&graph) as Arc<dyn GraphStore>,
            Arc::clone(&vectors) as Arc<dyn VectorStore>,
        );

        let docs = vec![document("doc-0")];
        let report = ingester.ingest_full(&docs, false, true).await;

        assert!(report.graph.is_none());
        assert_eq!(report.vectors.unwrap().successful, 1);
        assert_eq!(graph.writes.load(Ordering::SeqCst), 0);
        assert_eq!(vectors.writes.load(Ordering::SeqCst), 1);
    }
}
