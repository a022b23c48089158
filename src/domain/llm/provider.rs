use async_trait::async_trait;
use std::fmt::Debug;

use super::{LlmRequest, LlmResponse};
use crate::domain::DomainError;

/// Trait for chat completion providers
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::domain::llm::Message;
    use std::sync::Mutex;

    type Responder = Box<dyn Fn(&LlmRequest) -> String + Send + Sync>;

    pub struct MockLlmProvider {
        name: &'static str,
        response: Option<String>,
        responder: Option<Responder>,
        error: Option<String>,
        requests: Mutex<Vec<LlmRequest>>,
    }

    impl std::fmt::Debug for MockLlmProvider {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MockLlmProvider")
                .field("name", &self.name)
                .field("response", &self.response)
                .field("error", &self.error)
                .finish()
        }
    }

    impl MockLlmProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                response: None,
                responder: None,
                error: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_response(mut self, content: impl Into<String>) -> Self {
            self.response = Some(content.into());
            self
        }

        /// Compute the answer from the request
        pub fn with_responder(
            mut self,
            responder: impl Fn(&LlmRequest) -> String + Send + Sync + 'static,
        ) -> Self {
            self.responder = Some(Box::new(responder));
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn requests(&self) -> Vec<LlmRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
            self.requests.lock().unwrap().push(request.clone());

            if let Some(ref error) = self.error {
                return Err(DomainError::provider(self.name, error));
            }

            let content = match (&self.responder, &self.response) {
                (Some(responder), _) => responder(&request),
                (None, Some(response)) => response.clone(),
                (None, None) => {
                    return Err(DomainError::provider(
                        self.name,
                        "No mock response configured",
                    ));
                }
            };

            Ok(LlmResponse::new("mock-id", model, Message::assistant(content)))
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
