//! Document ingestion infrastructure
//!
//! This module provides implementations for PDF parsing, token chunking,
//! text cleanup and the ingestion pipeline.

pub mod chunkers;
pub mod cleaner;
pub mod parsers;
pub mod pipeline;

pub use chunkers::TokenChunker;
pub use cleaner::clean_text;
pub use parsers::PdfParser;
pub use pipeline::{DocumentPreparer, IngestionPipeline, PreparedDocument};
