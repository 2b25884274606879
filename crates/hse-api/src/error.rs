//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from hse-engine and hse-retention to HTTP status
//! codes and a uniform JSON body. A denial is an ordinary outcome here,
//! never a 500; internal error details are never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use hse_engine::EngineError;
use hse_retention::RetentionError;
use hse_state::FieldError;

/// Structured JSON error response body.
///
/// All error responses use this format. The `details` field carries the
/// field-by-field breakdown of 422 validation errors and is omitted
/// everywhere else.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. `"NOT_FOUND"`, `"VALIDATION_ERROR"`).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field-level breakdown, present only for validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found, or not visible to the caller (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Field-level validation failures (422).
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Request body could not be parsed (422).
    ///
    /// Normalized with `Validation`: the client sent syntactically valid
    /// HTTP but semantically invalid content, so both carry 422. Only
    /// malformed HTTP framing is 400, and Axum answers that before any
    /// handler runs.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure — missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure — the gate or a role check said no (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Erasure refused by the retention guard (409).
    ///
    /// Carries the guard's human-readable reason: in-flight sessions or
    /// a running retention period with its end date.
    #[error("erasure blocked: {0}")]
    RetentionBlocked(String),

    /// Internal server error (500). Message is logged but not returned
    /// to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::RetentionBlocked(_) => (StatusCode::CONFLICT, "RETENTION_BLOCKED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        let details = match &self {
            Self::Validation(errors) => serde_json::to_value(errors).ok(),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert engine errors to API errors. Every variant has a natural
/// HTTP rendering; none of them is a 500.
impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound { what, id } => Self::NotFound(format!("{what} not found: {id}")),
            EngineError::Forbidden(reason) => Self::Forbidden(reason.to_string()),
            EngineError::Validation(errors) => Self::Validation(errors),
            EngineError::State(e) => Self::Conflict(e.to_string()),
            EngineError::Conflict(reason) => Self::Conflict(reason),
        }
    }
}

/// Convert retention errors to API errors.
impl From<RetentionError> for AppError {
    fn from(err: RetentionError) -> Self {
        match err {
            RetentionError::UserNotFound(id) => Self::NotFound(format!("user not found: {id}")),
            RetentionError::Blocked(denial) => Self::RetentionBlocked(denial.to_string()),
            not_subject @ RetentionError::NotSubject => Self::Forbidden(not_subject.to_string()),
        }
    }
}
