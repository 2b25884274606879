//! # Bearer Authentication
//!
//! Token format: `Authorization: Bearer {role}:{user_id}:{secret}`.
//! The secret is compared against the configured shared secret in
//! constant time; the claimed account must exist and hold the claimed
//! role. The legacy form `Bearer {secret}` grants an unbound ADMIN
//! identity so the first real accounts can be created.
//!
//! The middleware resolves the caller into a [`CallerIdentity`] and
//! injects it into request extensions; handlers receive it through the
//! extractor impl below. When no secret is configured, authentication is
//! disabled and every request runs as the bootstrap admin (development
//! mode).

use std::str::FromStr;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::{header, request::Parts};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use hse_core::{Role, User};

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, resolved by the auth middleware.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    /// The resolved account. Bootstrap callers get a synthetic admin
    /// account that exists only for the duration of the request.
    pub user: User,
    /// Whether this identity came from the legacy single-part token or
    /// from disabled authentication.
    pub bootstrap: bool,
}

impl CallerIdentity {
    /// Identity bound to a stored account.
    pub fn of(user: User) -> Self {
        Self {
            user,
            bootstrap: false,
        }
    }

    /// Unbound admin identity for the legacy token and disabled auth.
    pub fn bootstrap_admin() -> Self {
        Self {
            user: User::new("admin", "Administrateur", Role::Admin),
            bootstrap: true,
        }
    }

    /// Require a staff role (secretary, principal, admin).
    pub fn require_staff(&self) -> Result<&User, AppError> {
        if self.user.role.is_staff() {
            Ok(&self.user)
        } else {
            Err(AppError::Forbidden(format!(
                "{} role cannot access this resource",
                self.user.role
            )))
        }
    }

    /// Require the ADMIN role.
    pub fn require_admin(&self) -> Result<&User, AppError> {
        if self.user.role == Role::Admin {
            Ok(&self.user)
        } else {
            Err(AppError::Forbidden(format!(
                "{} role cannot access this resource, ADMIN required",
                self.user.role
            )))
        }
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))
    }
}

/// Constant-time comparison of bearer secrets.
///
/// When lengths differ, performs a dummy comparison to avoid leaking
/// length information through timing variance.
fn constant_time_secret_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Resolve a bearer token into a caller identity.
///
/// The full form must name an existing account holding the claimed role;
/// a stale or mismatched claim reads the same as a bad secret (401).
fn resolve_identity(
    token: &str,
    expected_secret: &str,
    state: &AppState,
) -> Result<CallerIdentity, String> {
    let parts: Vec<&str> = token.splitn(3, ':').collect();
    match parts.len() {
        // Legacy form: just the secret. Unbound admin for bootstrap.
        1 => {
            if constant_time_secret_eq(token, expected_secret) {
                Ok(CallerIdentity::bootstrap_admin())
            } else {
                Err("invalid bearer token".to_string())
            }
        }
        // Full form: role:user_id:secret.
        3 => {
            let (role_str, id_str, secret) = (parts[0], parts[1], parts[2]);
            if !constant_time_secret_eq(secret, expected_secret) {
                return Err("invalid bearer token".to_string());
            }
            let role = Role::from_str(role_str).map_err(|e| e.to_string())?;
            let id =
                Uuid::parse_str(id_str).map_err(|_| format!("invalid user id in token: {id_str}"))?;
            let user = state
                .users
                .get(&id)
                .ok_or_else(|| format!("unknown user: {id}"))?;
            if user.role != role {
                return Err(format!(
                    "role mismatch: token claims {role}, account holds {}",
                    user.role
                ));
            }
            Ok(CallerIdentity::of(user))
        }
        _ => Err("invalid token format, expected {role}:{user_id}:{secret} or {secret}".to_string()),
    }
}

/// Extract and validate the bearer token from the Authorization header.
///
/// Injects the resolved [`CallerIdentity`] into request extensions for
/// downstream handlers. When `AppConfig.auth_secret` is `None`, all
/// requests run as the bootstrap admin.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(expected_secret) = state.config.auth_secret.clone() else {
        request
            .extensions_mut()
            .insert(CallerIdentity::bootstrap_admin());
        return next.run(request).await;
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let Some(header_value) = auth_header else {
        tracing::warn!("authentication failed: missing authorization header");
        return unauthorized("missing authorization header");
    };
    let Some(token) = header_value.strip_prefix("Bearer ") else {
        tracing::warn!("authentication failed: non-Bearer authorization scheme");
        return unauthorized("authorization header must use Bearer scheme");
    };

    match resolve_identity(token, &expected_secret, &state) {
        Ok(identity) => {
            tracing::debug!(
                user = %identity.user.id,
                role = %identity.user.role,
                bootstrap = identity.bootstrap,
                "caller authenticated"
            );
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(reason) => {
            tracing::warn!(reason = %reason, "authentication failed: invalid bearer token");
            unauthorized(&reason)
        }
    }
}

fn unauthorized(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}
