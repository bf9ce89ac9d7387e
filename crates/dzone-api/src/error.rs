//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from dzone-core and dzone-state to HTTP status codes
//! and JSON bodies with an error code, message, and optional details.
//! Internal error details are never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dzone_state::ResolutionFailure;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "RESOLUTION_FAILED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The current async resolution failed upstream (422). The failure is
    /// echoed in `details` so the client can show the right message.
    #[error("{0}")]
    Resolution(ResolutionFailure),

    /// Feature switched off in configuration (503).
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Resolution(_) => (StatusCode::UNPROCESSABLE_ENTITY, "RESOLUTION_FAILED"),
            Self::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Resolution(failure) => serde_json::to_value(failure).ok(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: self.details(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert dzone-core validation errors to API errors.
impl From<dzone_core::ValidationError> for AppError {
    fn from(err: dzone_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ResolutionFailure> for AppError {
    fn from(failure: ResolutionFailure) -> Self {
        Self::Resolution(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dzone_state::{GeocodingError, GeolocationError};
    use http_body_util::BodyExt;

    #[test]
    fn not_found_status_code() {
        let (status, code) = AppError::NotFound("session".into()).status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn resolution_status_code() {
        let err = AppError::from(ResolutionFailure::from(GeolocationError::Timeout));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "RESOLUTION_FAILED");
    }

    #[test]
    fn validation_error_from_dzone_core() {
        let core_err = dzone_core::ValidationError::UnknownSource("carrier-pigeon".to_string());
        match AppError::from(core_err) {
            AppError::Validation(msg) => assert!(msg.contains("carrier-pigeon"), "got: {msg}"),
            other => panic!("expected Validation, got: {other:?}"),
        }
    }

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_resolution_carries_details() {
        let err = AppError::Resolution(GeocodingError::NoResults.into());
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.code, "RESOLUTION_FAILED");
        assert_eq!(body.error.message, "geocoding failed: no results for address");
        assert_eq!(
            body.error.details,
            Some(serde_json::json!({"channel": "geocoding", "error": {"kind": "no_results"}}))
        );
    }

    #[tokio::test]
    async fn into_response_bad_request() {
        let (status, body) = response_parts(AppError::BadRequest("malformed".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "BAD_REQUEST");
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) = response_parts(AppError::Internal("lock poisoned".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        assert_eq!(body.error.message, "An internal error occurred");
    }

    #[tokio::test]
    async fn into_response_unavailable() {
        let (status, body) = response_parts(AppError::Unavailable("metrics disabled".into())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error.code, "SERVICE_UNAVAILABLE");
    }
}
