//! PDF RAG Service
//!
//! Answers questions about a bundled PDF document:
//! - Startup ingestion: page extraction, token chunking, embedding
//! - `/chat`: retrieval-augmented answers from an OpenAI-compatible model
//! - `/search`: previews of the most similar chunks

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use domain::{EmbeddingProvider, LlmProvider, VectorStore};
use infrastructure::{
    embedding::OpenAiEmbeddingProvider,
    ingestion::{DocumentPreparer, IngestionPipeline},
    knowledge_base::InMemoryVectorStore,
    llm::{HttpClient, OpenAiProvider},
    services::{IngestionSupervisor, RagService},
};

/// Shared state plus the not-yet-started ingestion task
pub struct Application {
    pub state: AppState,
    pub ingestion: IngestionSupervisor,
}

/// Build the application with OpenAI-compatible providers from configuration
pub fn create_app_with_config(config: &AppConfig) -> anyhow::Result<Application> {
    let (embedding, llm) = create_providers(config)?;
    create_app_with_providers(config, embedding, llm)
}

/// Build the embedding and chat providers sharing one HTTP client
pub fn create_providers(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn EmbeddingProvider>, Arc<dyn LlmProvider>)> {
    let provider = &config.provider;
    let api_key = provider.resolved_api_key().unwrap_or_else(|| {
        tracing::warn!(
            "No API key configured (provider.api_key or {}); model calls will fail",
            crate::config::API_KEY_ENV
        );
        String::new()
    });

    let client = HttpClient::with_timeout(Duration::from_secs(provider.timeout_secs))?;

    let embedding: Arc<dyn EmbeddingProvider> = Arc::new(
        OpenAiEmbeddingProvider::with_base_url(client.clone(), api_key.clone(), &provider.base_url)
            .with_model(&provider.embedding_model),
    );
    let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::with_base_url(
        client,
        api_key,
        &provider.base_url,
    ));

    Ok((embedding, llm))
}

/// Build the application around the given providers
pub fn create_app_with_providers(
    config: &AppConfig,
    embedding: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
) -> anyhow::Result<Application> {
    let store: Arc<dyn VectorStore> = Arc::new(InMemoryVectorStore::new(embedding));

    let rag_service = RagService::new(store.clone(), llm, &config.provider.chat_model)
        .with_rewriter(config.chat.rewriter())
        .with_prompt_assembler(config.chat.prompt_assembler(config.provider.temperature))
        .with_preview_formatter(config.search.formatter())
        .with_chat_retrieval(config.chat.retrieval())
        .with_search_retrieval(config.search.retrieval());

    let preparer = DocumentPreparer::pdf(config.ingestion.chunking())
        .with_clean_text(config.ingestion.clean_text);
    let pipeline = IngestionPipeline::new(preparer, store.clone())
        .with_batch_size(config.ingestion.batch_size);
    let ingestion = IngestionSupervisor::new(Arc::new(pipeline), &config.ingestion.pdf_path);

    let state = AppState::new(Arc::new(rag_service), store, ingestion.status_handle());

    Ok(Application { state, ingestion })
}
