//! Chunking strategy trait and types

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Configuration for token-bounded chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in tokens
    pub chunk_size: usize,
    /// A natural break is only used as the cut point when it lies beyond
    /// this many characters
    pub min_chunk_size_chars: usize,
    /// Chunks shorter than this many characters are discarded
    pub min_chunk_length_to_embed: usize,
    /// Maximum number of chunks produced from one text
    pub max_num_chunks: usize,
    /// Keep line separators inside chunk text
    pub keep_separator: bool,
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Self::default()
        }
    }

    pub fn with_min_chunk_size_chars(mut self, chars: usize) -> Self {
        self.min_chunk_size_chars = chars;
        self
    }

    pub fn with_min_chunk_length_to_embed(mut self, chars: usize) -> Self {
        self.min_chunk_length_to_embed = chars;
        self
    }

    pub fn with_max_num_chunks(mut self, max: usize) -> Self {
        self.max_num_chunks = max;
        self
    }

    pub fn with_keep_separator(mut self, keep: bool) -> Self {
        self.keep_separator = keep;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be greater than 0"));
        }

        if self.max_num_chunks == 0 {
            return Err(DomainError::validation(
                "max_num_chunks must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            min_chunk_size_chars: 200,
            min_chunk_length_to_embed: 5,
            max_num_chunks: 10_000,
            keep_separator: true,
        }
    }
}

/// A chunk of text extracted from a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub content: String,
    /// Index of this chunk within its text (0-based)
    pub index: usize,
}

impl Chunk {
    pub fn new(content: impl Into<String>, index: usize) -> Self {
        Self {
            content: content.into(),
            index,
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Trait for chunking strategies
pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Split content into chunks
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError>;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}
