//! # Settings Routes
//!
//! Runtime-tunable system configuration. Reads are open to staff;
//! writes are ADMIN only and restricted to the known keys, so a typo
//! cannot mint a setting nobody reads.
//!
//! | Method | Path                  | Handler        |
//! |--------|-----------------------|----------------|
//! | `GET`  | `/v1/settings`        | `list_settings`|
//! | `GET`  | `/v1/settings/{key}`  | `get_setting`  |
//! | `PUT`  | `/v1/settings/{key}`  | `put_setting`  |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use hse_engine::KNOWN_KEYS;
use hse_state::FieldError;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for updating a setting.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateSettingRequest {
    /// New value. Known keys hold positive integers encoded as strings.
    pub value: String,
}

fn known_default(key: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, default)| *default)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/settings", get(list_settings))
        .route("/v1/settings/{key}", get(get_setting).put(put_setting))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /v1/settings — List all settings, defaults materialized.
#[utoipa::path(
    get,
    path = "/v1/settings",
    responses(
        (status = 200, description = "All settings, known keys materialized"),
        (status = 403, description = "Caller is not staff", body = crate::error::ErrorBody),
    ),
    tag = "settings"
)]
pub async fn list_settings(
    State(state): State<AppState>,
    identity: CallerIdentity,
) -> Result<impl IntoResponse, AppError> {
    identity.require_staff()?;
    for (key, default) in KNOWN_KEYS {
        state.settings.get_or_init(key, default);
    }
    let settings = state.settings.list();
    let total = settings.len();
    Ok(Json(serde_json::json!({
        "settings": settings,
        "total": total,
    })))
}

/// GET /v1/settings/{key} — Read one setting.
#[utoipa::path(
    get,
    path = "/v1/settings/{key}",
    params(("key" = String, Path, description = "Setting key, e.g. SESSION_EDIT_WINDOW")),
    responses(
        (status = 200, description = "The setting"),
        (status = 403, description = "Caller is not staff", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown key", body = crate::error::ErrorBody),
    ),
    tag = "settings"
)]
pub async fn get_setting(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    identity.require_staff()?;
    if let Some(setting) = state.settings.get(&key) {
        return Ok(Json(setting));
    }
    match known_default(&key) {
        Some(default) => Ok(Json(state.settings.get_or_init(&key, default))),
        None => Err(AppError::NotFound(format!("setting {key} not found"))),
    }
}

/// PUT /v1/settings/{key} — Update a known setting.
#[utoipa::path(
    put,
    path = "/v1/settings/{key}",
    params(("key" = String, Path, description = "Setting key, e.g. SESSION_EDIT_WINDOW")),
    request_body = UpdateSettingRequest,
    responses(
        (status = 200, description = "Setting after the update"),
        (status = 403, description = "Caller is not ADMIN", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown key", body = crate::error::ErrorBody),
        (status = 422, description = "Value is not a positive integer", body = crate::error::ErrorBody),
    ),
    tag = "settings"
)]
pub async fn put_setting(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(key): Path<String>,
    body: Result<Json<UpdateSettingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let admin = identity.require_admin()?;
    if known_default(&key).is_none() {
        return Err(AppError::NotFound(format!("setting {key} not found")));
    }
    let req = extract_json(body)?;
    let value = req.value.trim();
    let parsed: Result<u64, _> = value.parse();
    match parsed {
        Ok(n) if n > 0 => {}
        _ => {
            return Err(AppError::Validation(vec![FieldError::new(
                "value",
                format!("{key} must be a positive integer"),
            )]));
        }
    }
    let setting = state.settings.set(&key, value, &admin.display_name);
    Ok(Json(setting))
}
