//! # Notification Routes
//!
//! A caller's in-app inbox. Notifications are recorded by the lifecycle
//! engine on status changes; these routes only read the caller's own rows.
//!
//! | Method | Path                            | Handler              |
//! |--------|---------------------------------|----------------------|
//! | `GET`  | `/v1/notifications`             | `list_notifications` |
//! | `POST` | `/v1/notifications/{id}/read`   | `mark_read`          |

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::state::AppState;

/// Query parameters for listing notifications.
#[derive(Debug, Default, Deserialize)]
pub struct ListNotificationsParams {
    /// Restrict to unread notifications.
    #[serde(default)]
    pub unread: Option<bool>,
}

/// Build the notification router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/notifications", get(list_notifications))
        .route("/v1/notifications/{id}/read", post(mark_read))
}

/// GET /v1/notifications — The caller's notifications, newest first.
#[utoipa::path(
    get,
    path = "/v1/notifications",
    params(
        ("unread" = Option<bool>, Query, description = "Restrict to unread notifications"),
    ),
    responses(
        (status = 200, description = "The caller's notifications"),
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Query(params): Query<ListNotificationsParams>,
) -> Result<impl IntoResponse, AppError> {
    let unread_only = params.unread.unwrap_or(false);
    let notifications = state.recorder.for_user(identity.user.id, unread_only);
    let total = notifications.len();
    Ok(Json(serde_json::json!({
        "notifications": notifications,
        "total": total,
    })))
}

/// POST /v1/notifications/{id}/read — Mark one of the caller's notifications read.
#[utoipa::path(
    post,
    path = "/v1/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification UUID")),
    responses(
        (status = 200, description = "The notification, now read"),
        (status = 404, description = "Unknown notification, or not the caller's", body = crate::error::ErrorBody),
    ),
    tag = "notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    match state.recorder.mark_read(identity.user.id, id.into()) {
        Some(notification) => Ok(Json(notification)),
        None => Err(AppError::NotFound(format!("notification {id} not found"))),
    }
}
