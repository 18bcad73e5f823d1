use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required data")]
    MissingData,

    #[error("{0}")]
    Validation(String),

    #[error("Failed to connect to API")]
    Upstream(#[source] LlmError),

    #[error("{0}")]
    Internal(String),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            e @ (LlmError::Http(_) | LlmError::Api { .. }) => AppError::Upstream(e),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingData | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(e) => {
                tracing::error!("Completion API request failed: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_status_maps_to_upstream() {
        let err = AppError::from(LlmError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        });
        assert!(matches!(err, AppError::Upstream(_)));
        assert_eq!(err.to_string(), "Failed to connect to API");
    }

    #[test]
    fn test_empty_content_exposes_message() {
        let err = AppError::from(LlmError::EmptyContent);
        assert_eq!(err.to_string(), "LLM returned empty content");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_data_is_bad_request() {
        assert_eq!(
            AppError::MissingData.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
