//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `DocumentParser` trait for extracting page text from a document
//! - `ChunkingStrategy` trait for splitting text into chunks
//! - Report and status types for the startup ingestion run

pub mod chunker;
pub mod parser;
pub mod pipeline;

pub use chunker::{Chunk, ChunkingConfig, ChunkingStrategy};
pub use parser::{DocumentParser, ParsedDocument, ParsedPage, ParserInput};
pub use pipeline::{IngestionReport, IngestionStatus};

#[cfg(test)]
pub use parser::mock::MockDocumentParser;
