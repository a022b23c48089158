//! Chunking strategy implementations

mod token;

pub use token::TokenChunker;
