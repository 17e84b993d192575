// src/api/error.rs
// Centralized error handling for HTTP API responses

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::error;

use crate::error::VersusError;

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub error_code: Option<String>,
}

impl ApiError {
    fn with_code(status_code: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
            error_code: Some(code.to_string()),
        }
    }

    /// Create a new internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    /// Create a new bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// Create a new conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::CONFLICT, "CONFLICT", message)
    }

    /// An upstream collaborator (analyzer, explainer) failed
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::with_code(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response_json = json!({
            "error": true,
            "message": self.message,
            "status": self.status_code.as_u16()
        });

        if let Some(error_code) = self.error_code {
            response_json["error_code"] = json!(error_code);
        }

        (self.status_code, Json(response_json)).into_response()
    }
}

impl From<VersusError> for ApiError {
    fn from(err: VersusError) -> Self {
        match err {
            VersusError::Validation { .. } => ApiError::bad_request(err.to_string()),
            VersusError::NotFound(_) => ApiError::not_found(err.to_string()),
            VersusError::Conflict(_) => ApiError::conflict(err.to_string()),
            VersusError::Analyzer(_) | VersusError::Explainer(_) => {
                ApiError::bad_gateway(err.to_string())
            }
            other => {
                // Storage and config details stay in the log
                error!("Internal error: {:?}", other);
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let error = ApiError::internal("Test error");
        assert_eq!(error.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message, "Test error");
    }

    #[test]
    fn test_versus_error_mapping() {
        let cases = [
            (VersusError::validation("fromAnalysisId", "does not exist"), StatusCode::BAD_REQUEST),
            (VersusError::not_found("comparison x"), StatusCode::NOT_FOUND),
            (VersusError::Conflict("pair".to_string()), StatusCode::CONFLICT),
            (VersusError::Analyzer("timeout".to_string()), StatusCode::BAD_GATEWAY),
            (VersusError::Explainer("quota".to_string()), StatusCode::BAD_GATEWAY),
            (VersusError::Config("bad port".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code, status);
        }
    }

    #[test]
    fn test_validation_message_names_side() {
        let error = ApiError::from(VersusError::validation("toAnalysisId", "does not exist"));
        assert!(error.message.contains("toAnalysisId"));
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let error = ApiError::from(VersusError::Db(sqlx::Error::RowNotFound));
        assert_eq!(error.message, "Internal server error");
    }
}
