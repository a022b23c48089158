//! Supervised startup ingestion of the bundled document

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::ingestion::IngestionStatus;
use crate::infrastructure::ingestion::IngestionPipeline;
use crate::infrastructure::observability::{record_ingestion, record_ingestion_failure};

/// Shared, cloneable view of the ingestion lifecycle
#[derive(Debug, Clone)]
pub struct IngestionStatusHandle {
    inner: Arc<RwLock<IngestionStatus>>,
}

impl IngestionStatusHandle {
    pub fn new() -> Self {
        Self::with_status(IngestionStatus::Pending)
    }

    pub fn with_status(status: IngestionStatus) -> Self {
        Self {
            inner: Arc::new(RwLock::new(status)),
        }
    }

    pub async fn get(&self) -> IngestionStatus {
        self.inner.read().await.clone()
    }

    pub async fn set(&self, status: IngestionStatus) {
        *self.inner.write().await = status;
    }
}

impl Default for IngestionStatusHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the ingestion pipeline for one file and records the outcome.
///
/// Failures never propagate: they are logged, counted and kept in the
/// status handle so the service keeps serving.
#[derive(Debug, Clone)]
pub struct IngestionSupervisor {
    pipeline: Arc<IngestionPipeline>,
    path: PathBuf,
    status: IngestionStatusHandle,
}

impl IngestionSupervisor {
    pub fn new(pipeline: Arc<IngestionPipeline>, path: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            path: path.into(),
            status: IngestionStatusHandle::new(),
        }
    }

    pub fn status_handle(&self) -> IngestionStatusHandle {
        self.status.clone()
    }

    /// Ingest the file and return the final status
    pub async fn run(&self) -> IngestionStatus {
        self.status.set(IngestionStatus::running()).await;
        info!(path = %self.path.display(), "Starting document ingestion");

        let status = match self.pipeline.ingest_file(&self.path).await {
            Ok(report) => {
                record_ingestion(report.chunks_added, report.chunks_skipped);
                IngestionStatus::completed(report)
            }
            Err(e) => {
                error!(
                    path = %self.path.display(),
                    error = %e,
                    "Document ingestion failed; continuing without its content"
                );
                record_ingestion_failure();
                IngestionStatus::failed(e.to_string())
            }
        };

        self.status.set(status.clone()).await;
        status
    }

    /// Run in the background; the returned handle resolves to the final status
    pub fn spawn(self) -> JoinHandle<IngestionStatus> {
        tokio::spawn(async move { self.run().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::ChunkingConfig;
    use crate::domain::knowledge_base::{MockVectorStore, VectorStore};
    use crate::infrastructure::ingestion::parsers::test_support::build_pdf;
    use crate::infrastructure::ingestion::DocumentPreparer;

    fn pipeline(store: Arc<dyn VectorStore>) -> Arc<IngestionPipeline> {
        Arc::new(IngestionPipeline::new(
            DocumentPreparer::pdf(ChunkingConfig::default()),
            store,
        ))
    }

    #[tokio::test]
    async fn test_status_handle_starts_pending() {
        let handle = IngestionStatusHandle::new();
        assert_eq!(handle.get().await, IngestionStatus::Pending);

        handle.set(IngestionStatus::failed("boom")).await;
        assert_eq!(handle.clone().get().await.error(), Some("boom"));
    }

    #[tokio::test]
    async fn test_run_completes_with_report() {
        let dir = std::env::temp_dir().join(format!("ingest-ok-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("article.pdf");
        std::fs::write(
            &path,
            build_pdf(&["INTRODUCTION The Beat Act was passed in 2024."]),
        )
        .unwrap();

        let store = Arc::new(MockVectorStore::new());
        let supervisor = IngestionSupervisor::new(pipeline(store.clone()), &path);
        let handle = supervisor.status_handle();

        let status = supervisor.run().await;

        match &status {
            IngestionStatus::Completed { report, .. } => {
                assert_eq!(report.source, "article.pdf");
                assert_eq!(report.pages, 1);
                assert!(report.chunks_added >= 1);
            }
            other => panic!("unexpected status: {:?}", other),
        }
        assert_eq!(handle.get().await, status);
        assert!(!store.documents().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_fails_without_panicking() {
        let store = Arc::new(MockVectorStore::new());
        let supervisor =
            IngestionSupervisor::new(pipeline(store.clone()), "/nonexistent/docs/missing.pdf");
        let handle = supervisor.status_handle();

        let status = supervisor.spawn().await.unwrap();

        assert_eq!(status.name(), "failed");
        assert!(status.error().unwrap().contains("missing.pdf"));
        assert_eq!(handle.get().await.name(), "failed");
        assert!(store.documents().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_recorded() {
        let dir = std::env::temp_dir().join(format!("ingest-fail-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("article.pdf");
        std::fs::write(&path, build_pdf(&["Some page text for the store."])).unwrap();

        let supervisor = IngestionSupervisor::new(pipeline(Arc::new(MockVectorStore::failing())), &path);

        let status = supervisor.run().await;

        assert!(status.is_finished());
        assert!(status.error().unwrap().contains("Vector store error"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
