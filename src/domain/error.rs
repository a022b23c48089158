use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Ingestion error: {message}")]
    Ingestion { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Vector store error: {0}")]
    VectorStore(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn ingestion(message: impl Into<String>) -> Self {
        Self::Ingestion {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn vector_store(message: impl Into<String>) -> Self {
        Self::VectorStore(message.into())
    }

    /// Whether the error originates from an external collaborator
    /// (embedding endpoint, chat endpoint or the vector store)
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::VectorStore(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
        assert!(!error.is_upstream());
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("openai", "HTTP 429: rate limited");
        assert_eq!(
            error.to_string(),
            "Provider error: openai - HTTP 429: rate limited"
        );
        assert!(error.is_upstream());
    }

    #[test]
    fn test_ingestion_error() {
        let error = DomainError::ingestion("Failed to read docs/missing.pdf");
        assert_eq!(
            error.to_string(),
            "Ingestion error: Failed to read docs/missing.pdf"
        );
    }
}
