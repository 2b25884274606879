//! # User Routes
//!
//! Account administration. Responses go through [`UserResponse`] so the
//! credential hash can never leak into a payload, whatever the `User`
//! record carries.
//!
//! | Method | Path              | Handler       |
//! |--------|-------------------|---------------|
//! | `POST` | `/v1/users`       | `create_user` |
//! | `GET`  | `/v1/users`       | `list_users`  |
//! | `GET`  | `/v1/users/{id}`  | `get_user`    |

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use hse_core::{Role, User};
use hse_state::FieldError;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for creating an account.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    /// Login name, unique across accounts.
    pub username: String,
    /// Name shown in reviews and audit records.
    pub display_name: String,
    /// One of `TEACHER`, `SECRETARY`, `PRINCIPAL`, `ADMIN`.
    #[schema(value_type = String)]
    pub role: Role,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push(FieldError::new("username", "username must not be empty"));
        } else if self.username.len() > 64 {
            errors.push(FieldError::new("username", "username must be 64 characters or fewer"));
        }
        if self.display_name.trim().is_empty() {
            errors.push(FieldError::new(
                "display_name",
                "display name must not be empty",
            ));
        } else if self.display_name.len() > 128 {
            errors.push(FieldError::new(
                "display_name",
                "display name must be 128 characters or fewer",
            ));
        }
        errors
    }
}

/// An account as exposed over the API. Never carries credentials.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// Account UUID.
    #[schema(value_type = Uuid)]
    pub id: hse_core::UserId,
    /// Login name.
    pub username: String,
    /// Name shown in reviews and audit records.
    pub display_name: String,
    /// Account role.
    #[schema(value_type = String)]
    pub role: Role,
    /// Creation instant.
    #[schema(value_type = String)]
    pub created_at: hse_core::Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/users", get(list_users).post(create_user))
        .route("/v1/users/{id}", get(get_user))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/users — Create an account.
#[utoipa::path(
    post,
    path = "/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 403, description = "Caller is not ADMIN", body = crate::error::ErrorBody),
        (status = 409, description = "Username already taken", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    identity: CallerIdentity,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    identity.require_admin()?;
    let req = extract_validated_json(body)?;
    let username = req.username.trim().to_string();
    if state.users.list().iter().any(|u| u.username == username) {
        return Err(AppError::Conflict(format!(
            "username {username} already taken"
        )));
    }
    let user = User::new(username, req.display_name.trim(), req.role);
    state.users.insert(*user.id.as_uuid(), user.clone());
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /v1/users — List all accounts.
#[utoipa::path(
    get,
    path = "/v1/users",
    responses(
        (status = 200, description = "All accounts"),
        (status = 403, description = "Caller is not staff", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    identity: CallerIdentity,
) -> Result<impl IntoResponse, AppError> {
    identity.require_staff()?;
    let mut users = state.users.list();
    users.sort_by(|a, b| a.username.cmp(&b.username));
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    let total = users.len();
    Ok(Json(serde_json::json!({
        "users": users,
        "total": total,
    })))
}

/// GET /v1/users/{id} — Fetch one account.
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "The account", body = UserResponse),
        (status = 404, description = "Unknown account, or not visible to the caller", body = crate::error::ErrorBody),
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    identity: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // Reads-as-absent: a teacher probing another account learns nothing.
    let is_self = *identity.user.id.as_uuid() == id;
    if !is_self && !identity.user.role.is_staff() {
        return Err(AppError::NotFound(format!("user {id} not found")));
    }
    match state.users.get(&id) {
        Some(user) => Ok(Json(UserResponse::from(user))),
        None if is_self && identity.bootstrap => {
            // Legacy-token admin has no stored row; answer from the identity.
            Ok(Json(UserResponse::from(identity.user)))
        }
        None => Err(AppError::NotFound(format!("user {id} not found"))),
    }
}
