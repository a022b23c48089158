//! Document chunk submitted to a vector store

use std::collections::HashMap;

use sha2::{Digest, Sha256};

/// Content-addressed id of a chunk: the hex SHA-256 of its text
pub fn content_id(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Chunk of source text to be embedded and stored
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Unique identifier for the chunk
    pub id: String,
    /// Chunk text
    pub content: String,
    /// Metadata key-value pairs (page number, chunk index, ...)
    pub metadata: HashMap<String, serde_json::Value>,
    /// Source file the chunk was extracted from
    pub source: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
            source: None,
        }
    }

    /// Create a document whose id is derived from its content, so identical
    /// text always maps to the same id
    pub fn from_content(content: impl Into<String>) -> Self {
        let content = content.into();
        Self::new(content_id(&content), content)
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
