//! Prompt assembly for grounded answering

use crate::domain::knowledge_base::SearchResult;
use crate::domain::llm::LlmRequest;

/// Answer the model is told to give when the context does not support one
pub const DEFAULT_FALLBACK_ANSWER: &str = "I don't know.";

/// System instruction; `{fallback_answer}` is replaced when assembling
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.
Use ONLY the provided CONTEXT to answer the USER question.
If the context is insufficient, reply exactly with \"{fallback_answer}\".
Be concise, accurate, and professional.
Always answer in English.";

const CONTEXT_FENCE: &str = "---------------------";

/// Builds the chat request sent to the model: the system instruction in the
/// system role, and the question plus retrieved context in the user role
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    system_prompt: String,
    temperature: Option<f32>,
}

impl PromptAssembler {
    pub fn new(system_prompt: &str, fallback_answer: &str) -> Self {
        Self {
            system_prompt: system_prompt.replace("{fallback_answer}", fallback_answer),
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn assemble(&self, question: &str, context: &[SearchResult]) -> LlmRequest {
        LlmRequest::builder()
            .system(self.system_prompt.clone())
            .user(Self::user_message(question, context))
            .maybe_temperature(self.temperature)
            .build()
    }

    fn user_message(question: &str, context: &[SearchResult]) -> String {
        let context_text = context
            .iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{question}\n\n\
             CONTEXT information is below, surrounded by {fence}\n\n\
             {fence}\n{context_text}\n{fence}\n\n\
             Answer the USER question above using only the CONTEXT.",
            fence = CONTEXT_FENCE,
        )
    }
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT, DEFAULT_FALLBACK_ANSWER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MessageRole;

    #[test]
    fn test_system_prompt_renders_fallback() {
        let assembler = PromptAssembler::default();
        assert!(
            assembler
                .system_prompt()
                .contains("reply exactly with \"I don't know.\".")
        );
        assert!(!assembler.system_prompt().contains("{fallback_answer}"));
    }

    #[test]
    fn test_assemble_places_roles() {
        let assembler = PromptAssembler::default().with_temperature(Some(0.0));
        let context = vec![
            SearchResult::new("1", "The Beat Act was passed in 2024.", 0.9),
            SearchResult::new("2", "It regulates drums.", 0.5),
        ];

        let request = assembler.assemble("When was the Beat Act passed?", &context);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.temperature, Some(0.0));

        let user = request.content_for(MessageRole::User).unwrap();
        assert!(user.starts_with("When was the Beat Act passed?"));
        assert!(user.contains(
            "---------------------\nThe Beat Act was passed in 2024.\nIt regulates drums.\n---------------------"
        ));
        assert!(!user.contains("You are a helpful assistant."));
    }

    #[test]
    fn test_empty_context() {
        let request = PromptAssembler::default().assemble("capital of Mars?", &[]);
        let user = request.content_for(MessageRole::User).unwrap();
        assert!(user.contains("---------------------\n\n---------------------"));
    }
}
