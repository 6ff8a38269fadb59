//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::ServiceError;

use crate::view;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Resource not found.
    NotFound(String),
    /// Internal server error. The detail is logged, never sent.
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message safe to show a client, logging internal detail.
    fn into_public_message(self) -> String {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => msg,
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "internal server error");
                metrics::counter!("http_internal_errors_total").increment(1);
                "internal server error".to_string()
            }
        }
    }

    /// Renders the error as a `text/plain` response.
    pub fn into_text_response(self) -> Response {
        let status = self.status();
        let body = view::render_error(&self.into_public_message());
        (status, body).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.into_public_message() });
        (status, axum::Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(_) => ApiError::BadRequest(err.to_string()),
            ServiceError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ServiceError::Persistence(_) => ApiError::Internal(err.to_string()),
        }
    }
}
