//! Ingestion run report and lifecycle status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a completed ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Source file name
    pub source: String,
    /// Pages extracted from the document
    pub pages: usize,
    /// Chunks produced by the splitter
    pub chunks_created: usize,
    /// Chunks newly embedded and stored
    pub chunks_added: usize,
    /// Chunks already present in the store
    pub chunks_skipped: usize,
    pub duration_ms: u64,
}

impl IngestionReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }
}

/// Lifecycle of the startup ingestion task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum IngestionStatus {
    Pending,
    Running {
        started_at: DateTime<Utc>,
    },
    Completed {
        report: IngestionReport,
        completed_at: DateTime<Utc>,
    },
    Failed {
        error: String,
        failed_at: DateTime<Utc>,
    },
}

impl IngestionStatus {
    pub fn running() -> Self {
        Self::Running {
            started_at: Utc::now(),
        }
    }

    pub fn completed(report: IngestionReport) -> Self {
        Self::Completed {
            report,
            completed_at: Utc::now(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
            failed_at: Utc::now(),
        }
    }

    /// Whether the run has finished, successfully or not
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running { .. } => "running",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}
