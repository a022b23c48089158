//! Token-bounded chunking that prefers to cut at natural breaks

use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::{Chunk, ChunkingConfig, ChunkingStrategy};
use crate::domain::DomainError;

const BREAK_CHARS: [char; 4] = ['.', '?', '!', '\n'];

/// Splits text into windows of `chunk_size` tokens, cutting each window
/// after its last sentence or line break when that break lies beyond
/// `min_chunk_size_chars` characters.
///
/// A token is a non-whitespace Unicode word-boundary segment together with
/// the whitespace preceding it, so windows decode back to the exact source
/// text.
#[derive(Debug, Clone, Default)]
pub struct TokenChunker;

impl TokenChunker {
    pub fn new() -> Self {
        Self
    }

    /// Byte offset at which each token ends
    fn token_ends(text: &str) -> Vec<usize> {
        text.split_word_bound_indices()
            .filter(|(_, segment)| !segment.chars().all(char::is_whitespace))
            .map(|(start, segment)| start + segment.len())
            .collect()
    }

    /// Cut after the last break character if it lies beyond `min_chars`
    fn cut_at_break(window: &str, min_chars: usize) -> &str {
        let last_break = window
            .char_indices()
            .enumerate()
            .filter(|(_, (_, c))| BREAK_CHARS.contains(c))
            .last();

        match last_break {
            Some((char_idx, (byte_idx, c))) if char_idx > min_chars => {
                &window[..byte_idx + c.len_utf8()]
            }
            _ => window,
        }
    }

    fn flatten(text: &str) -> String {
        text.replace('\n', " ").trim().to_string()
    }
}

impl ChunkingStrategy for TokenChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>, DomainError> {
        config.validate()?;

        let ends = Self::token_ends(content);
        let mut chunks = Vec::new();
        let mut pos = 0;
        let mut windows = 0;

        while pos < content.len() && windows < config.max_num_chunks {
            let first = ends.partition_point(|end| *end <= pos);
            let window_end = if first < ends.len() {
                ends[(first + config.chunk_size).min(ends.len()) - 1]
            } else {
                content.len()
            };
            let window = &content[pos..window_end];

            if window.trim().is_empty() {
                pos = window_end;
                continue;
            }

            let chunk_text = Self::cut_at_break(window, config.min_chunk_size_chars);
            let to_embed = if config.keep_separator {
                chunk_text.trim().to_string()
            } else {
                Self::flatten(chunk_text)
            };

            if to_embed.chars().count() > config.min_chunk_length_to_embed {
                chunks.push(Chunk::new(to_embed, chunks.len()));
            }

            pos += chunk_text.len();
            windows += 1;
        }

        if pos < content.len() {
            let remaining = Self::flatten(&content[pos..]);
            if remaining.chars().count() > config.min_chunk_length_to_embed {
                chunks.push(Chunk::new(remaining, chunks.len()));
            }
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "token"
    }
}
