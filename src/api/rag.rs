//! Question answering and chunk search endpoints

use axum::extract::State;
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Query, QuestionParams};
use crate::domain::DomainError;

/// GET /chat?q=
pub async fn chat(
    State(state): State<AppState>,
    Query(params): Query<QuestionParams>,
) -> Result<String, ApiError> {
    let question = params.require_q()?;
    info!(question_chars = question.chars().count(), "Processing chat request");

    state
        .rag_service
        .answer(question)
        .await
        .map_err(|e| into_api_error("chat", e))
}

/// GET /search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<QuestionParams>,
) -> Result<String, ApiError> {
    let query = params.require_q()?;
    info!(query_chars = query.chars().count(), "Processing search request");

    state
        .rag_service
        .search(query)
        .await
        .map_err(|e| into_api_error("search", e))
}

fn into_api_error(operation: &str, error: DomainError) -> ApiError {
    error!(operation, error = %error, upstream = error.is_upstream(), "Request failed");
    ApiError::from(error)
}
