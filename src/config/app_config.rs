use serde::Deserialize;

use crate::domain::ingestion::ChunkingConfig;
use crate::domain::rag::{
    ChunkPreviewFormatter, KeywordRewriteRule, PromptAssembler, QueryRewriter,
    DEFAULT_FALLBACK_ANSWER, DEFAULT_SYSTEM_PROMPT,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::services::RetrievalSettings;

/// Environment variable consulted when `provider.api_key` is empty
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// OpenAI-compatible endpoint used for both chat and embeddings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Configured key, or the `OPENAI_API_KEY` environment variable
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(&self.api_key, std::env::var(API_KEY_ENV).ok())
    }
}

fn resolve_api_key(configured: &str, from_env: Option<String>) -> Option<String> {
    if !configured.trim().is_empty() {
        return Some(configured.to_string());
    }
    from_env.filter(|key| !key.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    pub pdf_path: String,
    pub chunk_size: usize,
    pub min_chunk_size_chars: usize,
    pub min_chunk_length_to_embed: usize,
    pub max_num_chunks: usize,
    pub keep_separator: bool,
    pub clean_text: bool,
    pub batch_size: usize,
    /// Await ingestion before accepting connections
    pub wait_for_completion: bool,
}

impl IngestionConfig {
    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size)
            .with_min_chunk_size_chars(self.min_chunk_size_chars)
            .with_min_chunk_length_to_embed(self.min_chunk_length_to_embed)
            .with_max_num_chunks(self.max_num_chunks)
            .with_keep_separator(self.keep_separator)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub top_k: u32,
    pub similarity_threshold: f32,
    pub system_prompt: String,
    pub fallback_answer: String,
    pub rewrite_rules: Vec<KeywordRewriteRule>,
}

impl ChatConfig {
    pub fn retrieval(&self) -> RetrievalSettings {
        RetrievalSettings::new(self.top_k, self.similarity_threshold)
    }

    pub fn rewriter(&self) -> QueryRewriter {
        QueryRewriter::from_keyword_rules(self.rewrite_rules.clone())
    }

    pub fn prompt_assembler(&self, temperature: Option<f32>) -> PromptAssembler {
        PromptAssembler::new(&self.system_prompt, &self.fallback_answer)
            .with_temperature(temperature)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub top_k: u32,
    pub similarity_threshold: f32,
    pub preview_chars: usize,
    pub truncation_marker: String,
    pub separator: String,
}

impl SearchConfig {
    pub fn retrieval(&self) -> RetrievalSettings {
        RetrievalSettings::new(self.top_k, self.similarity_threshold)
    }

    pub fn formatter(&self) -> ChunkPreviewFormatter {
        ChunkPreviewFormatter::new(
            self.preview_chars,
            self.truncation_marker.clone(),
            self.separator.clone(),
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            temperature: None,
            timeout_secs: 120,
        }
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        let chunking = ChunkingConfig::default();
        Self {
            pdf_path: "resources/docs/article_thebeatact2024.pdf".to_string(),
            chunk_size: chunking.chunk_size,
            min_chunk_size_chars: chunking.min_chunk_size_chars,
            min_chunk_length_to_embed: chunking.min_chunk_length_to_embed,
            max_num_chunks: chunking.max_num_chunks,
            keep_separator: chunking.keep_separator,
            clean_text: false,
            batch_size: 100,
            wait_for_completion: true,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        let retrieval = RetrievalSettings::chat();
        Self {
            top_k: retrieval.top_k,
            similarity_threshold: retrieval.similarity_threshold,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string(),
            rewrite_rules: vec![KeywordRewriteRule::introduction()],
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        let retrieval = RetrievalSettings::search();
        let formatter = ChunkPreviewFormatter::default();
        Self {
            top_k: retrieval.top_k,
            similarity_threshold: retrieval.similarity_threshold,
            preview_chars: formatter.max_chars(),
            truncation_marker: formatter.marker().to_string(),
            separator: formatter.separator().to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_retrieval("chat", self.chat.top_k, self.chat.similarity_threshold)?;
        validate_retrieval("search", self.search.top_k, self.search.similarity_threshold)?;

        self.ingestion.chunking().validate()?;
        if self.ingestion.batch_size == 0 {
            return Err(DomainError::configuration(
                "ingestion.batch_size must be greater than 0",
            ));
        }

        if !self.chat.system_prompt.contains("{fallback_answer}") {
            tracing::warn!("chat.system_prompt does not mention {{fallback_answer}}");
        }

        for rule in &self.chat.rewrite_rules {
            rule.validate()?;
        }

        Ok(())
    }
}

fn validate_retrieval(section: &str, top_k: u32, threshold: f32) -> Result<(), DomainError> {
    if top_k == 0 {
        return Err(DomainError::configuration(format!(
            "{}.top_k must be greater than 0",
            section
        )));
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(DomainError::configuration(format!(
            "{}.similarity_threshold must be between 0.0 and 1.0, got {}",
            section, threshold
        )));
    }
    Ok(())
}
