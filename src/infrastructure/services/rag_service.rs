//! Retrieval-augmented answering and raw chunk search

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::knowledge_base::{SearchParams, SearchResult, VectorStore};
use crate::domain::llm::LlmProvider;
use crate::domain::rag::{ChunkPreviewFormatter, PromptAssembler, QueryRewriter};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_llm_request, record_retrieval, LlmRequestMetricParams,
};

/// How many chunks to retrieve and the minimum score to keep them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalSettings {
    pub top_k: u32,
    pub similarity_threshold: f32,
}

impl RetrievalSettings {
    pub fn new(top_k: u32, similarity_threshold: f32) -> Self {
        Self {
            top_k,
            similarity_threshold,
        }
    }

    /// Retrieval used when answering questions
    pub fn chat() -> Self {
        Self::new(10, 0.10)
    }

    /// Retrieval used by raw chunk search
    pub fn search() -> Self {
        Self::new(6, 0.0)
    }

    /// Fresh per-request search parameters
    fn params_for(&self, query: &str) -> SearchParams {
        SearchParams::new(query)
            .with_top_k(self.top_k)
            .with_similarity_threshold(self.similarity_threshold)
    }
}

/// Answers questions from retrieved document chunks
#[derive(Debug)]
pub struct RagService {
    store: Arc<dyn VectorStore>,
    llm: Arc<dyn LlmProvider>,
    chat_model: String,
    rewriter: QueryRewriter,
    assembler: PromptAssembler,
    formatter: ChunkPreviewFormatter,
    chat_retrieval: RetrievalSettings,
    search_retrieval: RetrievalSettings,
}

impl RagService {
    pub fn new(
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmProvider>,
        chat_model: impl Into<String>,
    ) -> Self {
        Self {
            store,
            llm,
            chat_model: chat_model.into(),
            rewriter: QueryRewriter::default(),
            assembler: PromptAssembler::default(),
            formatter: ChunkPreviewFormatter::default(),
            chat_retrieval: RetrievalSettings::chat(),
            search_retrieval: RetrievalSettings::search(),
        }
    }

    pub fn with_rewriter(mut self, rewriter: QueryRewriter) -> Self {
        self.rewriter = rewriter;
        self
    }

    pub fn with_prompt_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn with_preview_formatter(mut self, formatter: ChunkPreviewFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_chat_retrieval(mut self, settings: RetrievalSettings) -> Self {
        self.chat_retrieval = settings;
        self
    }

    pub fn with_search_retrieval(mut self, settings: RetrievalSettings) -> Self {
        self.search_retrieval = settings;
        self
    }

    /// Answer a question from the stored chunks; the model's text is
    /// returned unchanged
    pub async fn answer(&self, question: &str) -> Result<String, DomainError> {
        require_text(question)?;

        let rewritten = self.rewriter.rewrite(question);
        if rewritten != question {
            debug!(rewritten = %rewritten, "Question rewritten");
        }

        let context = self
            .retrieve("chat", self.chat_retrieval.params_for(&rewritten))
            .await?;
        let request = self.assembler.assemble(&rewritten, &context);

        let started = Instant::now();
        let result = self.llm.chat(&self.chat_model, request).await;
        let usage = result.as_ref().ok().and_then(|r| r.usage.clone());

        record_llm_request(LlmRequestMetricParams {
            provider: self.llm.provider_name(),
            model: &self.chat_model,
            duration: started.elapsed(),
            success: result.is_ok(),
            input_tokens: usage.as_ref().map(|u| u.prompt_tokens as u64),
            output_tokens: usage.as_ref().map(|u| u.completion_tokens as u64),
        });

        let response = result.inspect_err(|e| {
            warn!(error = %e, model = %self.chat_model, "Chat completion failed");
        })?;

        info!(
            context_chunks = context.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Question answered"
        );

        Ok(response.content().to_string())
    }

    /// Previews of the chunks most similar to the query, joined by the
    /// configured separator
    pub async fn search(&self, query: &str) -> Result<String, DomainError> {
        require_text(query)?;

        let results = self
            .retrieve("search", self.search_retrieval.params_for(query))
            .await?;

        Ok(self.formatter.format(&results))
    }

    async fn retrieve(
        &self,
        operation: &'static str,
        params: SearchParams,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let results = self
            .store
            .similarity_search(&params)
            .await
            .inspect_err(|e| warn!(error = %e, operation, "Retrieval failed"))?;

        record_retrieval(operation, results.len());
        debug!(
            operation,
            top_k = params.top_k,
            threshold = params.similarity_threshold,
            retrieved = results.len(),
            "Retrieved chunks"
        );

        Ok(results)
    }
}

fn require_text(value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation("Query text cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::knowledge_base::MockVectorStore;
    use crate::domain::llm::{MessageRole, MockLlmProvider};
    use crate::domain::rag::DEFAULT_FALLBACK_ANSWER;

    const INTRO_PREFIX: &str = "Answer strictly based on the INTRODUCTION section only. Question: ";

    fn beat_act_results() -> Vec<SearchResult> {
        vec![
            SearchResult::new("1", "The Beat Act was passed in 2024.", 0.8),
            SearchResult::new("2", "INTRODUCTION The act regulates rhythm.", 0.3),
            SearchResult::new("3", "Unrelated appendix text.", 0.05),
        ]
    }

    fn service(store: Arc<MockVectorStore>, llm: Arc<MockLlmProvider>) -> RagService {
        RagService::new(store, llm, "gpt-4o-mini")
    }

    #[tokio::test]
    async fn test_answer_uses_chat_retrieval_per_call() {
        let store = Arc::new(MockVectorStore::new().with_search_results(beat_act_results()));
        let llm = Arc::new(MockLlmProvider::new("mock").with_response("It was passed in 2024."));
        let service = service(store.clone(), llm.clone());

        let answer = service.answer("What year was the Beat Act passed?").await.unwrap();
        assert_eq!(answer, "It was passed in 2024.");

        let searches = store.searches();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].query, "What year was the Beat Act passed?");
        assert_eq!(searches[0].top_k, 10);
        assert!((searches[0].similarity_threshold - 0.10).abs() < f32::EPSILON);

        // Chunk below the threshold never reaches the model
        let requests = llm.requests();
        let user = requests[0].content_for(MessageRole::User).unwrap();
        assert!(user.contains("The Beat Act was passed in 2024."));
        assert!(!user.contains("Unrelated appendix text."));
    }

    #[tokio::test]
    async fn test_introduction_question_is_rewritten() {
        let store = Arc::new(MockVectorStore::new().with_search_results(beat_act_results()));
        let llm = Arc::new(MockLlmProvider::new("mock").with_response("It regulates rhythm."));
        let service = service(store.clone(), llm.clone());

        service.answer("What does the Introduction cover?").await.unwrap();

        let expected = format!("{}What does the Introduction cover?", INTRO_PREFIX);
        assert_eq!(store.searches()[0].query, expected);
        let user = llm.requests()[0]
            .content_for(MessageRole::User)
            .unwrap()
            .to_string();
        assert!(user.starts_with(&expected));
    }

    #[tokio::test]
    async fn test_other_questions_forwarded_unmodified() {
        let store = Arc::new(MockVectorStore::new());
        let llm = Arc::new(MockLlmProvider::new("mock").with_response("ok"));
        let service = service(store.clone(), llm);

        service.answer("Who signed the act?").await.unwrap();
        assert_eq!(store.searches()[0].query, "Who signed the act?");
    }

    #[tokio::test]
    async fn test_answer_never_echoes_system_prompt() {
        let store = Arc::new(MockVectorStore::new().with_search_results(beat_act_results()));
        // Model that returns nothing at all
        let llm = Arc::new(MockLlmProvider::new("mock").with_response(""));
        let service = service(store, llm.clone());

        let answer = service.answer("When?").await.unwrap();

        assert_eq!(answer, "");
        let system = llm.requests()[0]
            .content_for(MessageRole::System)
            .unwrap()
            .to_string();
        assert!(system.contains(DEFAULT_FALLBACK_ANSWER));
    }

    #[tokio::test]
    async fn test_empty_context_returns_model_sentinel() {
        let store = Arc::new(MockVectorStore::new());
        let llm = Arc::new(MockLlmProvider::new("mock").with_responder(|request| {
            let user = request.content_for(MessageRole::User).unwrap_or_default();
            if user.contains("The Beat Act was passed in 2024.") {
                "It was passed in 2024.".to_string()
            } else {
                DEFAULT_FALLBACK_ANSWER.to_string()
            }
        }));
        let service = service(store, llm);

        let answer = service.answer("What is the capital of Mars?").await.unwrap();
        assert_eq!(answer, "I don't know.");
    }

    #[tokio::test]
    async fn test_search_uses_search_retrieval_and_previews() {
        let long = "x".repeat(300);
        let store = Arc::new(MockVectorStore::new().with_search_results(vec![
            SearchResult::new("1", "Beat Act chunk", 0.9),
            SearchResult::new("2", long.clone(), 0.5),
        ]));
        let llm = Arc::new(MockLlmProvider::new("mock"));
        let service = service(store.clone(), llm.clone());

        let body = service.search("Beat Act").await.unwrap();

        assert_eq!(body, format!("Beat Act chunk\n---\n{}…", &long[..240]));
        assert_eq!(store.searches()[0].top_k, 6);
        assert_eq!(store.searches()[0].similarity_threshold, 0.0);
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_search_top_k_limits_results() {
        let results = (0..10)
            .map(|i| SearchResult::new(i.to_string(), format!("chunk {}", i), 0.5))
            .collect();
        let store = Arc::new(MockVectorStore::new().with_search_results(results));
        let service = service(store, Arc::new(MockLlmProvider::new("mock")));

        let body = service.search("chunk").await.unwrap();
        assert_eq!(body.split("\n---\n").count(), 6);
    }

    #[tokio::test]
    async fn test_custom_retrieval_settings() {
        let store = Arc::new(MockVectorStore::new());
        let service = service(store.clone(), Arc::new(MockLlmProvider::new("mock")))
            .with_search_retrieval(RetrievalSettings::new(3, 0.2));

        service.search("q").await.unwrap();
        assert_eq!(store.searches()[0].top_k, 3);
    }

    #[tokio::test]
    async fn test_store_failure_is_upstream_error() {
        let store = Arc::new(MockVectorStore::failing());
        let llm = Arc::new(MockLlmProvider::new("mock").with_response("unused"));
        let service = service(store, llm.clone());

        assert!(service.answer("q").await.unwrap_err().is_upstream());
        assert!(service.search("q").await.unwrap_err().is_upstream());
        assert!(llm.requests().is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_is_upstream_error() {
        let store = Arc::new(MockVectorStore::new());
        let llm = Arc::new(MockLlmProvider::new("openai").with_error("HTTP 500"));
        let service = service(store, llm);

        let error = service.answer("q").await.unwrap_err();
        assert!(error.is_upstream());
    }

    #[tokio::test]
    async fn test_blank_query_is_validation_error() {
        let service = service(
            Arc::new(MockVectorStore::new()),
            Arc::new(MockLlmProvider::new("mock")),
        );

        assert!(matches!(
            service.answer("   ").await,
            Err(DomainError::Validation { .. })
        ));
        assert!(matches!(
            service.search("").await,
            Err(DomainError::Validation { .. })
        ));
    }
}
