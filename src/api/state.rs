//! Application state for shared services

use std::sync::Arc;

use crate::domain::knowledge_base::VectorStore;
use crate::domain::DomainError;
use crate::infrastructure::services::{IngestionStatusHandle, RagService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub rag_service: Arc<dyn RagServiceTrait>,
    pub vector_store: Arc<dyn VectorStore>,
    pub ingestion_status: IngestionStatusHandle,
}

impl AppState {
    pub fn new(
        rag_service: Arc<dyn RagServiceTrait>,
        vector_store: Arc<dyn VectorStore>,
        ingestion_status: IngestionStatusHandle,
    ) -> Self {
        Self {
            rag_service,
            vector_store,
            ingestion_status,
        }
    }
}

/// Trait for question answering and chunk search
#[async_trait::async_trait]
pub trait RagServiceTrait: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, DomainError>;
    async fn search(&self, query: &str) -> Result<String, DomainError>;
}

#[async_trait::async_trait]
impl RagServiceTrait for RagService {
    async fn answer(&self, question: &str) -> Result<String, DomainError> {
        RagService::answer(self, question).await
    }

    async fn search(&self, query: &str) -> Result<String, DomainError> {
        RagService::search(self, query).await
    }
}
