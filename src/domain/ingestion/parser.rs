//! Document parser trait and types

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Raw document handed to a parser
#[derive(Debug, Clone)]
pub struct ParserInput {
    /// Document bytes
    pub content: Vec<u8>,
    /// Optional filename, used as the source of every extracted page
    pub filename: Option<String>,
}

impl ParserInput {
    pub fn from_bytes(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Text of a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// 1-based page number
    pub page_number: u32,
    pub content: String,
}

impl ParsedPage {
    pub fn new(page_number: u32, content: impl Into<String>) -> Self {
        Self {
            page_number,
            content: content.into(),
        }
    }
}

/// Result of parsing a document: one entry per page, in page order
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub pages: Vec<ParsedPage>,
    pub source: Option<String>,
}

impl ParsedDocument {
    pub fn new(pages: Vec<ParsedPage>) -> Self {
        Self {
            pages,
            source: None,
        }
    }

    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page produced any non-whitespace text
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.content.trim().is_empty())
    }
}

/// Trait for document parsers
#[async_trait]
pub trait DocumentParser: Send + Sync + Debug {
    /// Get supported file extensions (e.g., ["pdf"])
    fn supported_extensions(&self) -> &[&str];

    /// Extract the text of every page
    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError>;

    /// Check if this parser supports a given filename
    fn supports_file(&self, filename: &str) -> bool {
        let ext = filename
            .rsplit('.')
            .next()
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&ext))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;

    /// Mock parser returning fixed pages
    #[derive(Debug, Default)]
    pub struct MockDocumentParser {
        pages: Vec<String>,
        error: Option<String>,
    }

    impl MockDocumentParser {
        pub fn new(pages: &[&str]) -> Self {
            Self {
                pages: pages.iter().map(|p| p.to_string()).collect(),
                error: None,
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }
    }

    #[async_trait]
    impl DocumentParser for MockDocumentParser {
        fn supported_extensions(&self) -> &[&str] {
            &["pdf"]
        }

        async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::ingestion(error.clone()));
            }

            let pages = self
                .pages
                .iter()
                .enumerate()
                .map(|(idx, text)| ParsedPage::new(idx as u32 + 1, text.clone()))
                .collect();

            Ok(ParsedDocument::new(pages).with_source(input.filename))
        }
    }
}
