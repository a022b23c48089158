//! Ingestion pipeline: PDF bytes to stored, embedded chunks

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::domain::ingestion::{
    ChunkingConfig, ChunkingStrategy, DocumentParser, IngestionReport, ParserInput,
};
use crate::domain::knowledge_base::{AddDocumentsResult, Document, VectorStore};
use crate::domain::DomainError;

use super::chunkers::TokenChunker;
use super::cleaner::clean_text;
use super::parsers::PdfParser;

/// Chunks of one document, ready for the store
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub source: String,
    pub pages: usize,
    pub documents: Vec<Document>,
}

/// Extracts and splits a document without touching the store
#[derive(Debug, Clone)]
pub struct DocumentPreparer {
    parser: Arc<dyn DocumentParser>,
    chunker: Arc<dyn ChunkingStrategy>,
    chunking: ChunkingConfig,
    clean_text: bool,
}

impl DocumentPreparer {
    pub fn new(
        parser: Arc<dyn DocumentParser>,
        chunker: Arc<dyn ChunkingStrategy>,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            parser,
            chunker,
            chunking,
            clean_text: false,
        }
    }

    /// PDF extraction followed by token chunking
    pub fn pdf(chunking: ChunkingConfig) -> Self {
        Self::new(Arc::new(PdfParser::new()), Arc::new(TokenChunker::new()), chunking)
    }

    /// Normalize extracted text before chunking
    pub fn with_clean_text(mut self, clean: bool) -> Self {
        self.clean_text = clean;
        self
    }

    pub async fn prepare_file(&self, path: &Path) -> Result<PreparedDocument, DomainError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            DomainError::ingestion(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut input = ParserInput::from_bytes(bytes);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            input = input.with_filename(name);
        }

        self.prepare(input).await
    }

    pub async fn prepare(&self, input: ParserInput) -> Result<PreparedDocument, DomainError> {
        let parsed = self.parser.parse(input).await?;
        let source = parsed.source.clone().unwrap_or_else(|| "unknown".to_string());
        let total_pages = parsed.total_pages();

        let mut documents = Vec::new();
        for page in &parsed.pages {
            let text = if self.clean_text {
                clean_text(&page.content)
            } else {
                page.content.clone()
            };

            let chunks = self.chunker.chunk(&text, &self.chunking)?;
            debug!(
                page = page.page_number,
                chunks = chunks.len(),
                strategy = self.chunker.name(),
                "Chunked page"
            );

            for chunk in chunks {
                let chunk_index = documents.len();
                documents.push(
                    Document::from_content(chunk.content)
                        .with_source(source.clone())
                        .with_metadata("page_number", serde_json::json!(page.page_number))
                        .with_metadata("total_pages", serde_json::json!(total_pages))
                        .with_metadata("chunk_index", serde_json::json!(chunk_index)),
                );
            }
        }

        Ok(PreparedDocument {
            source,
            pages: total_pages,
            documents,
        })
    }
}

/// Prepares a document and writes its chunks to a vector store in batches
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    preparer: DocumentPreparer,
    store: Arc<dyn VectorStore>,
    batch_size: usize,
}

impl IngestionPipeline {
    pub fn new(preparer: DocumentPreparer, store: Arc<dyn VectorStore>) -> Self {
        Self {
            preparer,
            store,
            batch_size: 100,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub async fn ingest_file(&self, path: &Path) -> Result<IngestionReport, DomainError> {
        let started = Instant::now();
        let prepared = self.preparer.prepare_file(path).await?;
        self.store_prepared(prepared, started).await
    }

    pub async fn ingest(&self, input: ParserInput) -> Result<IngestionReport, DomainError> {
        let started = Instant::now();
        let prepared = self.preparer.prepare(input).await?;
        self.store_prepared(prepared, started).await
    }

    async fn store_prepared(
        &self,
        prepared: PreparedDocument,
        started: Instant,
    ) -> Result<IngestionReport, DomainError> {
        let chunks_created = prepared.documents.len();
        let mut stored = AddDocumentsResult::default();

        for batch in prepared.documents.chunks(self.batch_size) {
            let result = self.store.add_documents(batch.to_vec()).await?;
            debug!(
                added = result.added,
                skipped = result.skipped,
                "Stored chunk batch"
            );
            stored.merge(result);
        }

        let report = IngestionReport {
            source: prepared.source,
            pages: prepared.pages,
            chunks_created,
            chunks_added: stored.added,
            chunks_skipped: stored.skipped,
            duration_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            source = %report.source,
            pages = report.pages,
            chunks_created = report.chunks_created,
            chunks_added = report.chunks_added,
            chunks_skipped = report.chunks_skipped,
            duration_ms = report.duration_ms,
            store = self.store.store_type(),
            "Document ingested"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::MockDocumentParser;
    use crate::domain::knowledge_base::MockVectorStore;
    use crate::infrastructure::ingestion::parsers::test_support::build_pdf;

    fn mock_preparer(pages: &[&str]) -> DocumentPreparer {
        DocumentPreparer::new(
            Arc::new(MockDocumentParser::new(pages)),
            Arc::new(TokenChunker::new()),
            ChunkingConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_prepare_attaches_page_metadata() {
        let preparer = mock_preparer(&["First page text here.", "Second page text here."]);

        let prepared = preparer
            .prepare(ParserInput::from_bytes(Vec::new()).with_filename("article.pdf"))
            .await
            .unwrap();

        assert_eq!(prepared.source, "article.pdf");
        assert_eq!(prepared.pages, 2);
        assert_eq!(prepared.documents.len(), 2);

        let second = &prepared.documents[1];
        assert_eq!(second.content, "Second page text here.");
        assert_eq!(second.source.as_deref(), Some("article.pdf"));
        assert_eq!(second.metadata["page_number"], serde_json::json!(2));
        assert_eq!(second.metadata["total_pages"], serde_json::json!(2));
        assert_eq!(second.metadata["chunk_index"], serde_json::json!(1));
    }

    #[tokio::test]
    async fn test_clean_text_option() {
        let preparer = mock_preparer(&["legis-\nlation was\n\npassed"]).with_clean_text(true);

        let prepared = preparer
            .prepare(ParserInput::from_bytes(Vec::new()))
            .await
            .unwrap();

        assert_eq!(prepared.documents[0].content, "legislation was passed");
        assert_eq!(prepared.source, "unknown");
    }

    #[tokio::test]
    async fn test_ingest_batches_and_reports() {
        let store = Arc::new(MockVectorStore::new());
        let preparer = mock_preparer(&["Page one content.", "Page two content.", "Page three content."]);
        let pipeline = IngestionPipeline::new(preparer, store.clone()).with_batch_size(2);

        let report = pipeline
            .ingest(ParserInput::from_bytes(Vec::new()).with_filename("a.pdf"))
            .await
            .unwrap();

        assert_eq!(report.chunks_created, 3);
        assert_eq!(report.chunks_added, 3);
        assert_eq!(report.chunks_skipped, 0);
        assert_eq!(store.documents().len(), 3);

        let again = pipeline
            .ingest(ParserInput::from_bytes(Vec::new()).with_filename("a.pdf"))
            .await
            .unwrap();
        assert_eq!(again.chunks_added, 0);
        assert_eq!(again.chunks_skipped, 3);
        assert_eq!(store.documents().len(), 3);
    }

    #[tokio::test]
    async fn test_parser_failure_propagates() {
        let preparer = DocumentPreparer::new(
            Arc::new(MockDocumentParser::new(&[]).with_error("corrupt")),
            Arc::new(TokenChunker::new()),
            ChunkingConfig::default(),
        );
        let pipeline = IngestionPipeline::new(preparer, Arc::new(MockVectorStore::new()));

        let result = pipeline.ingest(ParserInput::from_bytes(Vec::new())).await;
        assert!(matches!(result, Err(DomainError::Ingestion { .. })));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let pipeline =
            IngestionPipeline::new(mock_preparer(&["Some page text."]), Arc::new(MockVectorStore::failing()));

        let result = pipeline.ingest(ParserInput::from_bytes(Vec::new())).await;
        assert!(matches!(result, Err(DomainError::VectorStore(_))));
    }

    #[tokio::test]
    async fn test_ingest_pdf_file() {
        let dir = std::env::temp_dir().join(format!("pdf-rag-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("beat.pdf");
        std::fs::write(&path, build_pdf(&["INTRODUCTION\nThe Beat Act was passed in 2024."])).unwrap();

        let store = Arc::new(MockVectorStore::new());
        let pipeline = IngestionPipeline::new(
            DocumentPreparer::pdf(ChunkingConfig::default()),
            store.clone(),
        );

        let report = pipeline.ingest_file(&path).await.unwrap();

        assert_eq!(report.source, "beat.pdf");
        assert_eq!(report.pages, 1);
        assert_eq!(report.chunks_added, 1);
        assert!(store.documents()[0].content.contains("The Beat Act was passed in 2024."));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_prepare_bundled_article() {
        let config = crate::config::IngestionConfig::default();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(&config.pdf_path);

        let prepared = DocumentPreparer::pdf(config.chunking())
            .prepare_file(&path)
            .await
            .unwrap();

        assert_eq!(prepared.source, "article_thebeatact2024.pdf");
        assert_eq!(prepared.pages, 2);
        assert_eq!(prepared.documents.len(), 2);
        assert!(prepared.documents[0].content.contains("The Beat Act was passed in 2024."));
    }

    #[tokio::test]
    async fn test_missing_file_is_ingestion_error() {
        let pipeline = IngestionPipeline::new(
            DocumentPreparer::pdf(ChunkingConfig::default()),
            Arc::new(MockVectorStore::new()),
        );

        let error = pipeline
            .ingest_file(Path::new("does/not/exist.pdf"))
            .await
            .unwrap_err();

        assert!(error.to_string().contains("does/not/exist.pdf"));
    }
}
