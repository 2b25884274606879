//! # Teacher Setup Routes
//!
//! The per-teacher declaration profile: school year and weekly quota of
//! paid extra hours. One row per teacher, readable and writable by the
//! teacher themselves or an ADMIN.
//!
//! | Method | Path                       | Handler     |
//! |--------|----------------------------|-------------|
//! | `PUT`  | `/v1/teachers/{id}/setup`  | `put_setup` |
//! | `GET`  | `/v1/teachers/{id}/setup`  | `get_setup` |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use hse_core::{Role, User, UserId};
use hse_retention::TeacherSetup;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Request body for writing a teacher's setup row.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TeacherSetupRequest {
    /// School year being declared for, e.g. `"2025-2026"`.
    pub school_year: String,
    /// Weekly quota of paid extra hours.
    pub weekly_quota_hours: u32,
}

/// Self-or-ADMIN rule shared by both handlers.
fn authorize_setup_access(caller: &User, teacher_id: Uuid) -> Result<(), AppError> {
    if *caller.id.as_uuid() == teacher_id || caller.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "only the teacher or an ADMIN may access this setup".to_string(),
        ))
    }
}

/// Build the teacher setup router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/teachers/{id}/setup", get(get_setup).put(put_setup))
}

/// PUT /v1/teachers/{id}/setup — Create or replace the setup row.
#[utoipa::path(
    put,
    path = "/v1/teachers/{id}/setup",
    params(("id" = Uuid, Path, description = "Teacher UUID")),
    request_body = TeacherSetupRequest,
    responses(
        (status = 200, description = "Setup row after the write"),
        (status = 403, description = "Caller is neither the teacher nor ADMIN", body = crate::error::ErrorBody),
        (status = 404, description = "No such teacher account", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "teachers"
)]
pub async fn put_setup(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<TeacherSetupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    authorize_setup_access(&identity.user, id)?;
    let target = state
        .users
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("user {id} not found")))?;
    if target.role != Role::Teacher {
        return Err(AppError::BadRequest(format!(
            "user {id} is not a TEACHER"
        )));
    }
    let req = extract_json(body)?;
    let mut setup = TeacherSetup::new(UserId::from(id), req.school_year, req.weekly_quota_hours);
    let errors = setup.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    // Replacing an existing row keeps its original creation instant.
    if let Some(existing) = state.setups.get(&id) {
        setup.created_at = existing.created_at;
    }
    state.setups.insert(id, setup.clone());
    Ok(Json(setup))
}

/// GET /v1/teachers/{id}/setup — Read the setup row.
#[utoipa::path(
    get,
    path = "/v1/teachers/{id}/setup",
    params(("id" = Uuid, Path, description = "Teacher UUID")),
    responses(
        (status = 200, description = "The setup row"),
        (status = 403, description = "Caller is neither the teacher nor ADMIN", body = crate::error::ErrorBody),
        (status = 404, description = "No setup declared for this teacher", body = crate::error::ErrorBody),
    ),
    tag = "teachers"
)]
pub async fn get_setup(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize_setup_access(&identity.user, id)?;
    match state.setups.get(&id) {
        Some(setup) => Ok(Json(setup)),
        None => Err(AppError::NotFound(format!(
            "no setup declared for teacher {id}"
        ))),
    }
}
