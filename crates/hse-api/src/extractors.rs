//! # JSON Extraction & Request Validation
//!
//! Helpers to extract JSON bodies without panicking on malformed input,
//! and the [`Validate`] trait for request DTOs whose rules are not
//! already enforced by the engine.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use hse_state::FieldError;

use crate::error::AppError;

/// Trait for request types that validate business rules beyond what
/// serde deserialization checks. An empty result means valid.
pub trait Validate {
    /// Field-by-field validation of the request.
    fn validate(&self) -> Vec<FieldError>;
}

/// Extract a JSON body, mapping deserialization errors to
/// [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    let errors = value.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    Ok(value)
}
