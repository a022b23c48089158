//! Domain layer - Core types, traits and answering rules

pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod knowledge_base;
pub mod llm;
pub mod rag;

pub use embedding::{Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use ingestion::{
    Chunk, ChunkingConfig, ChunkingStrategy, DocumentParser, IngestionReport, IngestionStatus,
    ParsedDocument, ParsedPage, ParserInput,
};
pub use knowledge_base::{AddDocumentsResult, Document, SearchParams, SearchResult, VectorStore};
pub use llm::{FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage};
pub use rag::{ChunkPreviewFormatter, KeywordRewriteRule, PromptAssembler, QueryRewriter};
