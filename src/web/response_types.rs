//! # Web API Error Types
//!
//! Defines error types specific to the web API and their HTTP response
//! conversions. thiserror carries the taxonomy; axum's IntoResponse turns
//! each error into the `{"error": {"code", "message"}}` wire shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::error::HelabookingError;

/// Web API specific errors with HTTP status code mappings
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Create a NotFound error naming the missing resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a BadRequest error with a custom message
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_code) = match &self {
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest { .. } => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let error_response = json!({
            "error": {
                "code": error_code,
                "message": self.to_string()
            }
        });

        (status_code, Json(error_response)).into_response()
    }
}

/// Convert domain errors to API errors
///
/// Reservation denials never reach this conversion: the saga settles them
/// into a FAILED booking and the handler answers 201.
impl From<HelabookingError> for ApiError {
    fn from(err: HelabookingError) -> Self {
        match err {
            HelabookingError::Validation(message) => ApiError::BadRequest { message },
            HelabookingError::NotFound(resource) => ApiError::NotFound { resource },
            other => {
                error!(error = %other, "Domain error surfaced at the web boundary");
                ApiError::Internal
            }
        }
    }
}

/// Result type alias for web API operations
pub type ApiResult<T> = Result<T, ApiError>;
