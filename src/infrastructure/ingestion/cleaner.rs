//! Normalization of text extracted from PDFs

use once_cell::sync::Lazy;
use regex::Regex;

/// Word split across a line break with a hyphen: `exam-\nple`
static HYPHENATED_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S)-\s*\n\s*(\S)").unwrap());

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

const SOFT_HYPHEN: char = '\u{00AD}';

/// Remove soft hyphens, re-join hyphenated words, flatten line breaks and
/// collapse whitespace
pub fn clean_text(text: &str) -> String {
    let text = text.replace(SOFT_HYPHEN, "");
    let text = HYPHENATED_BREAK.replace_all(&text, "$1$2");
    let text = LINE_BREAK.replace_all(&text, " ");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}
