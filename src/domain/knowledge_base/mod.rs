//! Vector store domain: stored chunks, search parameters and results

mod document;
mod entity;
mod provider;

pub use document::{content_id, Document};
pub use entity::SearchResult;
pub use provider::{AddDocumentsResult, SearchParams, VectorStore};

#[cfg(test)]
pub use provider::mock::MockVectorStore;
