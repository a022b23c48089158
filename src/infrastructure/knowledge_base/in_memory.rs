//! In-memory vector store with exact cosine ranking

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::embedding::{cosine_similarity, EmbeddingProvider, EmbeddingRequest};
use crate::domain::knowledge_base::{
    AddDocumentsResult, Document, SearchParams, SearchResult, VectorStore,
};
use crate::domain::DomainError;

/// Vector store keeping every entry in process memory; lifetime is the process
#[derive(Debug)]
pub struct InMemoryVectorStore {
    embedder: Arc<dyn EmbeddingProvider>,
    entries: RwLock<Vec<StoredEntry>>,
}

#[derive(Debug, Clone)]
struct StoredEntry {
    id: String,
    content: String,
    metadata: HashMap<String, serde_json::Value>,
    source: Option<String>,
    vector: Vec<f32>,
}

impl StoredEntry {
    fn to_result(&self, score: f32) -> SearchResult {
        SearchResult::new(&self.id, &self.content, score)
            .with_all_metadata(self.metadata.clone())
            .with_optional_source(self.source.clone())
    }
}

impl InMemoryVectorStore {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            entries: RwLock::new(Vec::new()),
        }
    }

    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError> {
        let request = EmbeddingRequest::new(self.embedder.model(), texts);
        Ok(self.embedder.embed(request).await?.into_vectors())
    }

    async fn known_ids(&self) -> HashSet<String> {
        self.entries
            .read()
            .await
            .iter()
            .map(|e| e.id.clone())
            .collect()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add_documents(
        &self,
        documents: Vec<Document>,
    ) -> Result<AddDocumentsResult, DomainError> {
        let mut seen = self.known_ids().await;
        let total = documents.len();

        let fresh: Vec<Document> = documents
            .into_iter()
            .filter(|doc| seen.insert(doc.id.clone()))
            .collect();

        if fresh.is_empty() {
            return Ok(AddDocumentsResult::new(0, total));
        }

        let vectors = self
            .embed(fresh.iter().map(|d| d.content.clone()).collect())
            .await?;

        if vectors.len() != fresh.len() {
            return Err(DomainError::vector_store(format!(
                "Embedding count mismatch: {} documents, {} vectors",
                fresh.len(),
                vectors.len()
            )));
        }

        let mut entries = self.entries.write().await;
        let mut added = 0;
        for (doc, vector) in fresh.into_iter().zip(vectors) {
            // Another writer may have stored the same id while we embedded
            if entries.iter().any(|e| e.id == doc.id) {
                continue;
            }
            entries.push(StoredEntry {
                id: doc.id,
                content: doc.content,
                metadata: doc.metadata,
                source: doc.source,
                vector,
            });
            added += 1;
        }

        debug!(added = added, total = entries.len(), "Stored document embeddings");

        Ok(AddDocumentsResult::new(added, total - added))
    }

    async fn similarity_search(
        &self,
        params: &SearchParams,
    ) -> Result<Vec<SearchResult>, DomainError> {
        params.validate()?;

        if self.entries.read().await.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embed(vec![params.query.clone()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::vector_store("No embedding returned for query"))?;

        let entries = self.entries.read().await;
        let mut scored: Vec<(f32, &StoredEntry)> = entries
            .iter()
            .map(|e| (cosine_similarity(&query_vector, &e.vector), e))
            .filter(|(score, _)| params.accepts(*score))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(params.top_k as usize);

        Ok(scored
            .into_iter()
            .map(|(score, entry)| entry.to_result(score))
            .collect())
    }

    async fn document_count(&self) -> Result<usize, DomainError> {
        Ok(self.entries.read().await.len())
    }

    fn store_type(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;

    const VOCABULARY: &[&str] = &["beat", "act", "passed", "2024", "drums", "mars", "capital"];

    fn store() -> (Arc<MockEmbeddingProvider>, InMemoryVectorStore) {
        let embedder = Arc::new(MockEmbeddingProvider::new(VOCABULARY));
        let store = InMemoryVectorStore::new(embedder.clone());
        (embedder, store)
    }

    fn docs() -> Vec<Document> {
        vec![
            Document::from_content("The Beat Act was passed in 2024.")
                .with_source("article.pdf")
                .with_metadata("page_number", serde_json::json!(1)),
            Document::from_content("Drums drums drums everywhere."),
            Document::from_content("Nothing relevant at all."),
        ]
    }

    #[tokio::test]
    async fn test_ranking_and_top_k() {
        let (_, store) = store();
        store.add_documents(docs()).await.unwrap();

        let results = store
            .similarity_search(&SearchParams::new("Beat Act").with_top_k(6))
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].content.contains("Beat Act"));
        assert_eq!(results[0].source.as_deref(), Some("article.pdf"));
        assert_eq!(results[0].metadata.get("page_number"), Some(&serde_json::json!(1)));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));

        let results = store
            .similarity_search(&SearchParams::new("Beat Act").with_top_k(1))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_threshold_filters_unrelated() {
        let (_, store) = store();
        store.add_documents(docs()).await.unwrap();

        let results = store
            .similarity_search(
                &SearchParams::new("What is the capital of Mars?")
                    .with_top_k(10)
                    .with_similarity_threshold(0.10),
            )
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_zero_threshold_keeps_negative_cosine() {
        let embedder = Arc::new(
            MockEmbeddingProvider::new(VOCABULARY)
                .with_fixed_vector("near chunk", vec![0.9, 0.1])
                .with_fixed_vector("far chunk", vec![-0.8, 0.2])
                .with_fixed_vector("query", vec![1.0, 0.0]),
        );
        let store = InMemoryVectorStore::new(embedder);
        store
            .add_documents(vec![
                Document::from_content("near chunk"),
                Document::from_content("far chunk"),
            ])
            .await
            .unwrap();

        let results = store
            .similarity_search(
                &SearchParams::new("query")
                    .with_top_k(6)
                    .with_similarity_threshold(0.0),
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "near chunk");
        assert_eq!(results[1].content, "far chunk");
        assert!(results[1].score < 0.0);

        let results = store
            .similarity_search(
                &SearchParams::new("query")
                    .with_top_k(6)
                    .with_similarity_threshold(0.10),
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_skipped() {
        let (embedder, store) = store();

        let first = store.add_documents(docs()).await.unwrap();
        let second = store.add_documents(docs()).await.unwrap();

        assert_eq!(first, AddDocumentsResult::new(3, 0));
        assert_eq!(second, AddDocumentsResult::new(0, 3));
        assert_eq!(store.document_count().await.unwrap(), 3);
        // Nothing new to embed on the second pass
        assert_eq!(embedder.calls(), 1);
    }

    #[tokio::test]
    async fn test_duplicates_within_batch() {
        let (_, store) = store();
        let result = store
            .add_documents(vec![Document::from_content("same"), Document::from_content("same")])
            .await
            .unwrap();

        assert_eq!(result, AddDocumentsResult::new(1, 1));
    }

    #[tokio::test]
    async fn test_empty_store_skips_query_embedding() {
        let (embedder, store) = store();

        let results = store
            .similarity_search(&SearchParams::new("anything"))
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let embedder = Arc::new(MockEmbeddingProvider::new(VOCABULARY).with_error("down"));
        let store = InMemoryVectorStore::new(embedder);

        let error = store.add_documents(docs()).await.unwrap_err();
        assert!(error.is_upstream());
        assert_eq!(store.document_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_params_rejected() {
        let (_, store) = store();
        let result = store
            .similarity_search(&SearchParams::new("q").with_top_k(0))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
