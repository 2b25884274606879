//! # hse-api — Axum API Services for HSE Declare
//!
//! The HTTP layer over the declaration engine: session lifecycle, edit
//! window, attachments, notifications, settings, accounts, and the RGPD
//! surface. Handlers stay thin; every domain decision is made by
//! `hse-engine` or `hse-retention` and translated to a status code here.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                     | Domain                |
//! |-------------------------|----------------------------|-----------------------|
//! | `/v1/sessions/*`        | [`routes::sessions`]       | Session lifecycle     |
//! | `/v1/attachments/*`     | [`routes::attachments`]    | Reviewer verdicts     |
//! | `/v1/settings/*`        | [`routes::settings`]       | System configuration  |
//! | `/v1/notifications/*`   | [`routes::notifications`]  | In-app inbox          |
//! | `/v1/users/*`           | [`routes::users`]          | Accounts              |
//! | `/v1/teachers/*`        | [`routes::teachers`]       | Declaration profiles  |
//! | `/v1/privacy/*`         | [`routes::privacy`]        | RGPD erasure / export |
//! | `/v1/openapi.json`      | [`openapi`]                | Generated contract    |
//! | `/health/*`             | (this module)              | Unauthenticated probes|
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the auth middleware so
/// they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    // Authenticated API routes.
    //
    // Body size limit: 1 MiB. Sessions, attachment descriptors, and
    // settings payloads are all small; oversized bodies are refused
    // before they reach a handler.
    let api = Router::new()
        .merge(routes::sessions::router())
        .merge(routes::attachments::router())
        .merge(routes::settings::router())
        .merge(routes::notifications::router())
        .merge(routes::users::router())
        .merge(routes::teachers::router())
        .merge(routes::privacy::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(from_fn_with_state(state.clone(), auth::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Unauthenticated health probes.
    let unauthenticated = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the stores answer before accepting traffic.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // Each len() takes and releases the store's read lock; a wedged
    // writer would surface here as a hang rather than a false "ready".
    let _ = state.users.len();
    let _ = state.sessions.len();
    let _ = state.attachments.len();
    let _ = state.notifications.len();
    (StatusCode::OK, "ready")
}
