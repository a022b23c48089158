//! Infrastructure services

mod ingestion_service;
mod rag_service;

pub use ingestion_service::{IngestionStatusHandle, IngestionSupervisor};
pub use rag_service::{RagService, RetrievalSettings};
