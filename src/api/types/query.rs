//! Query-string extractor that returns errors in the API error format

use axum::{
    extract::{FromRequestParts, Query as AxumQuery},
    http::request::Parts,
};
use serde::{de::DeserializeOwned, Deserialize};

use super::error::ApiError;

/// Wrapper around `axum::extract::Query` whose rejection is an [`ApiError`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(value)) => Ok(Query(value)),
            Err(rejection) => Err(ApiError::bad_request(format!(
                "Invalid query string: {}",
                rejection.body_text()
            ))
            .with_code("query_parse_error")),
        }
    }
}

/// `?q=` parameter shared by `/chat` and `/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionParams {
    pub q: Option<String>,
}

impl QuestionParams {
    /// The non-blank `q` value, or a 400 naming the parameter
    pub fn require_q(&self) -> Result<&str, ApiError> {
        match self.q.as_deref() {
            Some(q) if !q.trim().is_empty() => Ok(q),
            Some(_) => Err(ApiError::bad_request("Query parameter 'q' cannot be blank")
                .with_param("q")),
            None => Err(ApiError::bad_request("Missing required query parameter 'q'")
                .with_param("q")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    async fn extract(uri: &str) -> Result<Query<QuestionParams>, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        Query::<QuestionParams>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_decodes_question() {
        let Query(params) = extract("/chat?q=What%20year%3F").await.unwrap();
        assert_eq!(params.require_q().unwrap(), "What year?");
    }

    #[tokio::test]
    async fn test_missing_and_blank_q() {
        let Query(params) = extract("/chat").await.unwrap();
        let err = params.require_q().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.param.as_deref(), Some("q"));

        let Query(params) = extract("/chat?q=%20%20").await.unwrap();
        assert!(params.require_q().is_err());
    }
}
