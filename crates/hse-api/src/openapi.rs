//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/v1/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the Bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Bearer token of the form `{role}:{user_id}:{secret}`. \
                             The secret alone is accepted as a legacy bootstrap-admin token.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "HSE Declare API",
        version = "0.1.0",
        description = "Declaration and payment tracking for heures supplémentaires effectives (HSE) — \
            the extra duty hours of French secondary-school teachers.\n\nProvides:\n\
            - **Session lifecycle** — declaration, review, validation, payment, with a \
              role-conditioned transition graph and a full audit trail\n\
            - **Edit window** — time-boxed self-service corrections for teachers\n\
            - **Attachments** — supporting-document metadata with reviewer verdicts\n\
            - **Notifications** — per-teacher in-app inbox fed by status changes\n\
            - **Settings** — runtime-tunable edit window and retention period\n\
            - **Privacy** — RGPD right-to-erasure and data portability\n\n\
            Authentication: Bearer token via `Authorization: Bearer <token>` header.\n\
            All `/v1/*` endpoints require authentication. Health probes (`/health/*`) are unauthenticated.",
        license(name = "AGPL-3.0-or-later"),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        // ── Sessions ─────────────────────────────────────────────────────
        crate::routes::sessions::create_session,
        crate::routes::sessions::list_sessions,
        crate::routes::sessions::get_session,
        crate::routes::sessions::update_session,
        crate::routes::sessions::delete_session,
        crate::routes::sessions::edit_status,
        crate::routes::sessions::list_transitions,
        // ── Attachments ──────────────────────────────────────────────────
        crate::routes::attachments::register_attachment,
        crate::routes::attachments::list_attachments,
        crate::routes::attachments::review_attachment,
        // ── Settings ─────────────────────────────────────────────────────
        crate::routes::settings::list_settings,
        crate::routes::settings::get_setting,
        crate::routes::settings::put_setting,
        // ── Notifications ────────────────────────────────────────────────
        crate::routes::notifications::list_notifications,
        crate::routes::notifications::mark_read,
        // ── Users ────────────────────────────────────────────────────────
        crate::routes::users::create_user,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        // ── Teacher setup ────────────────────────────────────────────────
        crate::routes::teachers::put_setup,
        crate::routes::teachers::get_setup,
        // ── Privacy ──────────────────────────────────────────────────────
        crate::routes::privacy::request_erasure,
        crate::routes::privacy::export_data,
    ),
    components(
        schemas(
            // ── Error types ─────────────────────────────────────────────
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            // ── Session DTOs ────────────────────────────────────────────
            crate::routes::sessions::CreateSessionRequest,
            crate::routes::sessions::UpdateSessionRequest,
            crate::routes::sessions::EditStatusResponse,
            // ── Attachment DTOs ─────────────────────────────────────────
            crate::routes::attachments::RegisterAttachmentRequest,
            crate::routes::attachments::ReviewAttachmentRequest,
            // ── Settings DTOs ───────────────────────────────────────────
            crate::routes::settings::UpdateSettingRequest,
            // ── User DTOs ───────────────────────────────────────────────
            crate::routes::users::CreateUserRequest,
            crate::routes::users::UserResponse,
            // ── Teacher setup DTOs ──────────────────────────────────────
            crate::routes::teachers::TeacherSetupRequest,
            // ── Privacy DTOs ────────────────────────────────────────────
            crate::routes::privacy::ErasureRequest,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "sessions", description = "Session lifecycle — declaration, review, validation, payment"),
        (name = "attachments", description = "Supporting-document metadata and reviewer verdicts"),
        (name = "settings", description = "Runtime-tunable system configuration"),
        (name = "notifications", description = "Per-teacher in-app inbox fed by status changes"),
        (name = "users", description = "Account administration"),
        (name = "teachers", description = "Per-teacher declaration profile"),
        (name = "privacy", description = "RGPD right-to-erasure and data portability"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router, serving the spec at `/v1/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/openapi.json", get(openapi_json))
}

/// GET /v1/openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
