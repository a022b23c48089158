//! Health check endpoints for Kubernetes probes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;
use crate::domain::ingestion::IngestionStatus;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Returns 200 while the process is up
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness: ingestion finished and the store reachable.
/// A failed ingestion still serves (degraded).
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let checks = vec![
        check_ingestion(&state).await,
        check_vector_store(&state).await,
    ];

    let overall_status = checks
        .iter()
        .map(|c| c.status)
        .max()
        .unwrap_or(HealthStatus::Healthy);

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness probe
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_ingestion(state: &AppState) -> HealthCheck {
    let status = state.ingestion_status.get().await;

    let (health, message) = match &status {
        IngestionStatus::Pending | IngestionStatus::Running { .. } => {
            (HealthStatus::Unhealthy, Some(format!("ingestion {}", status.name())))
        }
        IngestionStatus::Completed { report, .. } => (
            HealthStatus::Healthy,
            Some(format!(
                "{} chunks from {} pages of {}",
                report.chunks_created, report.pages, report.source
            )),
        ),
        IngestionStatus::Failed { error, .. } => (HealthStatus::Degraded, Some(error.clone())),
    };

    HealthCheck {
        name: "ingestion".to_string(),
        status: health,
        message,
        latency_ms: None,
    }
}

async fn check_vector_store(state: &AppState) -> HealthCheck {
    let start = Instant::now();

    match state.vector_store.document_count().await {
        Ok(count) => HealthCheck {
            name: "vector_store".to_string(),
            status: HealthStatus::Healthy,
            message: Some(format!("{} documents", count)),
            latency_ms: Some(start.elapsed().as_millis() as u64),
        },
        Err(e) => HealthCheck {
            name: "vector_store".to_string(),
            status: HealthStatus::Degraded,
            message: Some(e.to_string()),
            latency_ms: Some(start.elapsed().as_millis() as u64),
        },
    }
}
