//! Plain-text rendering of search results for inspection

use crate::domain::knowledge_base::SearchResult;

/// Renders each result's text cut to `max_chars` characters, followed by a
/// marker when cut, and joins them with a separator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPreviewFormatter {
    max_chars: usize,
    marker: String,
    separator: String,
}

impl ChunkPreviewFormatter {
    pub fn new(max_chars: usize, marker: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            max_chars,
            marker: marker.into(),
            separator: separator.into(),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn preview(&self, text: &str) -> String {
        match text.char_indices().nth(self.max_chars) {
            Some((cut, _)) => format!("{}{}", &text[..cut], self.marker),
            None => text.to_string(),
        }
    }

    pub fn format(&self, results: &[SearchResult]) -> String {
        results
            .iter()
            .map(|r| self.preview(&r.content))
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

impl Default for ChunkPreviewFormatter {
    fn default() -> Self {
        Self::new(240, "…", "\n---\n")
    }
}
