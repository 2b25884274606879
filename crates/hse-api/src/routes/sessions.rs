//! # Session Routes
//!
//! The declaration lifecycle over HTTP. Every handler resolves the caller
//! through [`CallerIdentity`] and hands the domain decision to the
//! lifecycle engine; no authorization logic lives here.
//!
//! | Method   | Path                             | Handler               |
//! |----------|----------------------------------|-----------------------|
//! | `POST`   | `/v1/sessions`                   | `create_session`      |
//! | `GET`    | `/v1/sessions`                   | `list_sessions`       |
//! | `GET`    | `/v1/sessions/{id}`              | `get_session`         |
//! | `PATCH`  | `/v1/sessions/{id}`              | `update_session`      |
//! | `DELETE` | `/v1/sessions/{id}`              | `delete_session`      |
//! | `GET`    | `/v1/sessions/{id}/edit-status`  | `edit_status`         |
//! | `GET`    | `/v1/sessions/{id}/transitions`  | `list_transitions`    |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use hse_core::{TimeSlot, UserId};
use hse_engine::{EditStatusReport, NewSession};
use hse_state::{SessionChanges, SessionDetails, SessionStatus};

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for declaring a session.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateSessionRequest {
    /// Owning teacher. Optional for teachers (defaults to the caller);
    /// staff declaring on a teacher's behalf must name them.
    #[serde(default)]
    pub teacher_id: Option<Uuid>,
    /// Calendar date of the duty.
    pub date: NaiveDate,
    /// Slot within the day (`"M1"` … `"A4"`).
    #[schema(value_type = String)]
    pub time_slot: TimeSlot,
    /// Kind-specific payload, tagged by `type`.
    #[schema(value_type = Object)]
    pub details: SessionDetails,
}

/// Request body for updating a session. Absent fields are left untouched;
/// a `status` alongside field edits is one authorization decision.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateSessionRequest {
    /// New session date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// New time slot.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub time_slot: Option<TimeSlot>,
    /// Replacement payload (replaces the whole `details` value).
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub details: Option<SessionDetails>,
    /// Requested target status (`"PENDING_VALIDATION"`, `"PAID"`, …).
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub status: Option<SessionStatus>,
    /// Reviewer or declarer comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl UpdateSessionRequest {
    fn into_changes(self) -> SessionChanges {
        SessionChanges {
            date: self.date,
            time_slot: self.time_slot,
            details: self.details,
            status: self.status,
            comment: self.comment,
        }
    }
}

/// Query parameters for listing sessions.
#[derive(Debug, Default, Deserialize)]
pub struct ListSessionsParams {
    /// Narrow to one status.
    #[serde(default)]
    pub status: Option<SessionStatus>,
}

/// The edit-window report for one session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditStatusResponse {
    /// Whether self-service editing is currently open.
    pub is_editable: bool,
    /// The configured window, as read at evaluation time.
    pub edit_window_minutes: i64,
    /// Whole minutes since creation.
    pub elapsed_minutes: i64,
    /// Whole minutes of window left (zero once expired).
    pub remaining_minutes: i64,
}

impl From<EditStatusReport> for EditStatusResponse {
    fn from(report: EditStatusReport) -> Self {
        Self {
            is_editable: report.is_editable,
            edit_window_minutes: report.edit_window_minutes,
            elapsed_minutes: report.elapsed_minutes,
            remaining_minutes: report.remaining_minutes,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the session router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", get(list_sessions).post(create_session))
        .route(
            "/v1/sessions/{id}",
            get(get_session)
                .patch(update_session)
                .delete(delete_session),
        )
        .route("/v1/sessions/{id}/edit-status", get(edit_status))
        .route("/v1/sessions/{id}/transitions", get(list_transitions))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/sessions — Declare a new session.
#[utoipa::path(
    post,
    path = "/v1/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session declared in PENDING_REVIEW"),
        (status = 403, description = "Teacher declaring for someone else", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    identity: CallerIdentity,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = extract_json(body)?;
    let teacher_id = req
        .teacher_id
        .map(UserId::from)
        .unwrap_or(identity.user.id);
    let session = state.engine.create(
        &identity.user,
        NewSession {
            teacher_id,
            date: req.date,
            time_slot: req.time_slot,
            details: req.details,
        },
    )?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /v1/sessions — List visible sessions, newest first.
#[utoipa::path(
    get,
    path = "/v1/sessions",
    params(
        ("status" = Option<String>, Query, description = "Narrow to one status, e.g. PENDING_REVIEW"),
    ),
    responses(
        (status = 200, description = "Sessions visible to the caller"),
    ),
    tag = "sessions"
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Query(params): Query<ListSessionsParams>,
) -> Result<impl IntoResponse, AppError> {
    let sessions = state.engine.list(&identity.user, params.status);
    let total = sessions.len();
    Ok(Json(serde_json::json!({
        "sessions": sessions,
        "total": total,
    })))
}

/// GET /v1/sessions/{id} — Fetch one session.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session UUID")),
    responses(
        (status = 200, description = "The session"),
        (status = 404, description = "Unknown session, or not visible to the caller", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.engine.get(&identity.user, id.into())?;
    Ok(Json(session))
}

/// PATCH /v1/sessions/{id} — Apply a changeset to a session.
#[utoipa::path(
    patch,
    path = "/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session UUID")),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Session after the changeset"),
        (status = 403, description = "Refused by the authorization gate", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown session, or not visible to the caller", body = crate::error::ErrorBody),
        (status = 409, description = "Status change not in the session graph", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn update_session(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let req = extract_json(body)?;
    let session = state
        .engine
        .update(&identity.user, id.into(), req.into_changes())?;
    Ok(Json(session))
}

/// DELETE /v1/sessions/{id} — Delete a session and its attachments.
#[utoipa::path(
    delete,
    path = "/v1/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session UUID")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 403, description = "Refused by the authorization gate", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown session, or not visible to the caller", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn delete_session(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.engine.delete(&identity.user, id.into())?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/sessions/{id}/edit-status — The edit-window report.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}/edit-status",
    params(("id" = Uuid, Path, description = "Session UUID")),
    responses(
        (status = 200, description = "Edit-window report", body = EditStatusResponse),
        (status = 404, description = "Unknown session, or not visible to the caller", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn edit_status(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.engine.edit_status(&identity.user, id.into())?;
    Ok(Json(EditStatusResponse::from(report)))
}

/// GET /v1/sessions/{id}/transitions — The transition audit trail.
#[utoipa::path(
    get,
    path = "/v1/sessions/{id}/transitions",
    params(("id" = Uuid, Path, description = "Session UUID")),
    responses(
        (status = 200, description = "Recorded transitions, oldest first"),
        (status = 404, description = "Unknown session, or not visible to the caller", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn list_transitions(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.engine.get(&identity.user, id.into())?;
    let total = session.transitions.len();
    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "status": session.status,
        "transitions": session.transitions,
        "total": total,
    })))
}
