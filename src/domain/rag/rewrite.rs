//! Question rewriting rules applied before retrieval

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Placeholder replaced by the original question in rule templates
pub const QUESTION_PLACEHOLDER: &str = "{question}";

/// A predicate on the question paired with a transformation of it
#[cfg_attr(test, automock)]
pub trait RewriteRule: Send + Sync {
    /// Whether this rule applies to the question
    fn matches(&self, question: &str) -> bool;

    /// Produce the rewritten question
    fn apply(&self, question: &str) -> String;
}

/// Rewrites questions containing a keyword (case-insensitive literal
/// substring) using a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRewriteRule {
    pub keyword: String,
    /// Output text; `{question}` is replaced by the original question
    pub template: String,
}

impl KeywordRewriteRule {
    pub fn new(keyword: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            template: template.into(),
        }
    }

    /// Restrict answers about the introduction to that section of the document
    pub fn introduction() -> Self {
        Self::new(
            "introduction",
            "Answer strictly based on the INTRODUCTION section only. Question: {question}",
        )
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.keyword.trim().is_empty() {
            return Err(DomainError::validation("Rewrite rule keyword cannot be empty"));
        }
        if !self.template.contains(QUESTION_PLACEHOLDER) {
            return Err(DomainError::validation(format!(
                "Rewrite rule template for '{}' must contain {}",
                self.keyword, QUESTION_PLACEHOLDER
            )));
        }
        Ok(())
    }
}

impl RewriteRule for KeywordRewriteRule {
    fn matches(&self, question: &str) -> bool {
        question
            .to_lowercase()
            .contains(&self.keyword.to_lowercase())
    }

    fn apply(&self, question: &str) -> String {
        self.template.replace(QUESTION_PLACEHOLDER, question)
    }
}

/// Ordered rule list; the first matching rule wins
pub struct QueryRewriter {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl QueryRewriter {
    pub fn new(rules: Vec<Box<dyn RewriteRule>>) -> Self {
        Self { rules }
    }

    /// A rewriter that forwards every question unchanged
    pub fn passthrough() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_keyword_rules(rules: impl IntoIterator<Item = KeywordRewriteRule>) -> Self {
        Self::new(
            rules
                .into_iter()
                .map(|r| Box::new(r) as Box<dyn RewriteRule>)
                .collect(),
        )
    }

    pub fn rewrite<'a>(&self, question: &'a str) -> Cow<'a, str> {
        match self.rules.iter().find(|rule| rule.matches(question)) {
            Some(rule) => Cow::Owned(rule.apply(question)),
            None => Cow::Borrowed(question),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for QueryRewriter {
    fn default() -> Self {
        Self::from_keyword_rules([KeywordRewriteRule::introduction()])
    }
}

impl fmt::Debug for QueryRewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryRewriter")
            .field("rules", &self.rules.len())
            .finish()
    }
}
