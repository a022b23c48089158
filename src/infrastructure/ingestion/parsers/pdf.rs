//! Page-level PDF text extraction

use async_trait::async_trait;
use lopdf::Document as PdfDocument;
use tracing::{debug, warn};

use crate::domain::ingestion::{DocumentParser, ParsedDocument, ParsedPage, ParserInput};
use crate::domain::DomainError;

/// Parser producing one `ParsedPage` per PDF page
#[derive(Debug, Clone, Default)]
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(data: &[u8]) -> Result<Vec<ParsedPage>, DomainError> {
        let doc = PdfDocument::load_mem(data)
            .map_err(|e| DomainError::ingestion(format!("Failed to load PDF: {}", e)))?;

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(DomainError::ingestion("PDF has no pages"));
        }

        let mut parsed = Vec::with_capacity(pages.len());
        for page_number in pages.keys().copied() {
            let content = match doc.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    warn!(page = page_number, error = %e, "Could not extract text from page");
                    String::new()
                }
            };
            parsed.push(ParsedPage::new(page_number, content));
        }

        Ok(parsed)
    }
}

#[async_trait]
impl DocumentParser for PdfParser {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
        let ParserInput { content, filename } = input;

        // lopdf is synchronous and CPU-bound
        let pages = tokio::task::spawn_blocking(move || Self::extract_pages(&content))
            .await
            .map_err(|e| DomainError::internal(format!("PDF extraction task failed: {}", e)))??;

        let document = ParsedDocument::new(pages).with_source(filename);
        if document.is_blank() {
            return Err(DomainError::ingestion(
                "No text content could be extracted from PDF",
            ));
        }

        debug!(
            pages = document.total_pages(),
            source = ?document.source,
            "Extracted PDF text"
        );

        Ok(document)
    }
}
