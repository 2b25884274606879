//! # Attachment Routes
//!
//! Metadata for supporting documents. Binary storage is out of scope;
//! clients register file descriptors and reviewers mark them verified
//! or archived.
//!
//! | Method  | Path                             | Handler               |
//! |---------|----------------------------------|-----------------------|
//! | `POST`  | `/v1/sessions/{id}/attachments`  | `register_attachment` |
//! | `GET`   | `/v1/sessions/{id}/attachments`  | `list_attachments`    |
//! | `PATCH` | `/v1/attachments/{id}`           | `review_attachment`   |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for registering an attachment on a session.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterAttachmentRequest {
    /// Original file name, e.g. `"convocation.pdf"`.
    pub file_name: String,
    /// MIME type as reported by the client.
    pub content_type: String,
    /// Size of the upload in bytes.
    pub size_bytes: u64,
}

/// Request body for a reviewer verdict on an attachment. Absent fields
/// are left untouched.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ReviewAttachmentRequest {
    /// Mark the document checked against the declaration.
    #[serde(default)]
    pub verified: Option<bool>,
    /// Move the document out of the active review set.
    #[serde(default)]
    pub archived: Option<bool>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the attachment router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/sessions/{id}/attachments",
            get(list_attachments).post(register_attachment),
        )
        .route("/v1/attachments/{id}", patch(review_attachment))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/sessions/{id}/attachments — Register a supporting document.
#[utoipa::path(
    post,
    path = "/v1/sessions/{id}/attachments",
    params(("id" = Uuid, Path, description = "Session UUID")),
    request_body = RegisterAttachmentRequest,
    responses(
        (status = 201, description = "Attachment registered"),
        (status = 404, description = "Unknown session, or not visible to the caller", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "attachments"
)]
pub async fn register_attachment(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<RegisterAttachmentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = extract_json(body)?;
    let attachment = state.engine.add_attachment(
        &identity.user,
        id.into(),
        req.file_name,
        req.content_type,
        req.size_bytes,
    )?;
    Ok((StatusCode::CREATED, Json(attachment)))
}

/// GET /v1/sessions/{id}/attachments — List a session's documents, oldest first.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}/attachments",
    params(("id" = Uuid, Path, description = "Session UUID")),
    responses(
        (status = 200, description = "Attachments on the session"),
        (status = 404, description = "Unknown session, or not visible to the caller", body = crate::error::ErrorBody),
    ),
    tag = "attachments"
)]
pub async fn list_attachments(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let attachments = state.engine.list_attachments(&identity.user, id.into())?;
    let total = attachments.len();
    Ok(Json(serde_json::json!({
        "attachments": attachments,
        "total": total,
    })))
}

/// PATCH /v1/attachments/{id} — Record a reviewer verdict.
#[utoipa::path(
    patch,
    path = "/v1/attachments/{id}",
    params(("id" = Uuid, Path, description = "Attachment UUID")),
    request_body = ReviewAttachmentRequest,
    responses(
        (status = 200, description = "Attachment after the verdict"),
        (status = 403, description = "Caller is not a reviewer", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown attachment", body = crate::error::ErrorBody),
    ),
    tag = "attachments"
)]
pub async fn review_attachment(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<ReviewAttachmentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = extract_json(body)?;
    let attachment =
        state
            .engine
            .review_attachment(&identity.user, id.into(), req.verified, req.archived)?;
    Ok(Json(attachment))
}
