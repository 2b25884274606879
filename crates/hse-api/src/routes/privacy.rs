//! # Privacy Routes
//!
//! The RGPD surface: right-to-erasure and data portability. The subject
//! rule and the retention verdict live in [`hse_retention::PrivacyService`];
//! these handlers only translate the outcomes to HTTP.
//!
//! | Method | Path                             | Handler           |
//! |--------|----------------------------------|-------------------|
//! | `POST` | `/v1/privacy/erasure`            | `request_erasure` |
//! | `GET`  | `/v1/privacy/export/{user_id}`   | `export_data`     |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use hse_core::UserId;
use hse_state::FieldError;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request body for a right-to-erasure demand.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ErasureRequest {
    /// The subject whose data is to be erased.
    pub user_id: Uuid,
    /// Free-text motivation, recorded in the erasure report.
    pub reason: String,
}

impl Validate for ErasureRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.reason.trim().is_empty() {
            errors.push(FieldError::new("reason", "reason must not be empty"));
        }
        errors
    }
}

/// Build the privacy router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/privacy/erasure", post(request_erasure))
        .route("/v1/privacy/export/{user_id}", get(export_data))
}

/// POST /v1/privacy/erasure — Erase a user's data set.
#[utoipa::path(
    post,
    path = "/v1/privacy/erasure",
    request_body = ErasureRequest,
    responses(
        (status = 200, description = "Erasure performed; counts per store in the report"),
        (status = 403, description = "Caller is neither the subject nor ADMIN", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown subject user", body = crate::error::ErrorBody),
        (status = 409, description = "Blocked by the retention policy", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "privacy"
)]
pub async fn request_erasure(
    State(state): State<AppState>,
    identity: CallerIdentity,
    body: Result<Json<ErasureRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = extract_validated_json(body)?;
    let report = state.privacy.request_erasure(
        &identity.user,
        UserId::from(req.user_id),
        req.reason.trim(),
    )?;
    Ok(Json(report))
}

/// GET /v1/privacy/export/{user_id} — Export a user's data set.
#[utoipa::path(
    get,
    path = "/v1/privacy/export/{user_id}",
    params(("user_id" = Uuid, Path, description = "Subject user UUID")),
    responses(
        (status = 200, description = "Portable JSON projection of the user's data"),
        (status = 403, description = "Caller is neither the subject nor ADMIN", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown subject user", body = crate::error::ErrorBody),
    ),
    tag = "privacy"
)]
pub async fn export_data(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let bundle = state
        .privacy
        .export_data(&identity.user, UserId::from(user_id))?;
    Ok(Json(bundle))
}
