//! Retrieval-augmented answering: question rewriting, prompt assembly and
//! result previews

mod preview;
mod prompt;
mod rewrite;

pub use preview::ChunkPreviewFormatter;
pub use prompt::{PromptAssembler, DEFAULT_FALLBACK_ANSWER, DEFAULT_SYSTEM_PROMPT};
pub use rewrite::{KeywordRewriteRule, QueryRewriter, RewriteRule};

#[cfg(test)]
pub use rewrite::MockRewriteRule;
