//! Vector store trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::document::Document;
use super::entity::SearchResult;
use crate::domain::error::DomainError;

/// Per-call similarity search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Query text to search for
    pub query: String,
    /// Maximum number of results to return
    pub top_k: u32,
    /// Minimum similarity score (0.0 - 1.0), inclusive; 0.0 disables filtering
    pub similarity_threshold: f32,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: 4,
            similarity_threshold: 0.0,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Whether a result with this score passes the threshold.
    ///
    /// Cosine scores can be negative, so a zero threshold keeps everything.
    pub fn accepts(&self, score: f32) -> bool {
        self.similarity_threshold <= 0.0 || score >= self.similarity_threshold
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.query.trim().is_empty() {
            return Err(DomainError::validation("Search query cannot be empty"));
        }
        if self.top_k == 0 {
            return Err(DomainError::validation("top_k must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(DomainError::validation(format!(
                "similarity_threshold must be between 0.0 and 1.0, got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }
}

/// Outcome of adding documents to a store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddDocumentsResult {
    /// Documents embedded and stored
    pub added: usize,
    /// Documents whose id was already present
    pub skipped: usize,
}

impl AddDocumentsResult {
    pub fn new(added: usize, skipped: usize) -> Self {
        Self { added, skipped }
    }

    pub fn merge(&mut self, other: AddDocumentsResult) {
        self.added += other.added;
        self.skipped += other.skipped;
    }
}

/// Store of embedded chunks supporting nearest-neighbour search
///
/// Implementations embed document text on insert and the query text on
/// search. Ids are unique: adding a document whose id already exists is a
/// no-op counted as skipped.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Embed and store documents
    async fn add_documents(
        &self,
        documents: Vec<Document>,
    ) -> Result<AddDocumentsResult, DomainError>;

    /// Return at most `top_k` documents scoring at least the threshold,
    /// most similar first
    async fn similarity_search(
        &self,
        params: &SearchParams,
    ) -> Result<Vec<SearchResult>, DomainError>;

    /// Number of stored documents
    async fn document_count(&self) -> Result<usize, DomainError>;

    /// Backend name
    fn store_type(&self) -> &'static str;
}
