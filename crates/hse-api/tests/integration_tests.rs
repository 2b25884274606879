//! # Integration Tests for hse-api
//!
//! Exercises the full HTTP surface against a seeded state: authentication
//! middleware, the session lifecycle, attachment review, settings,
//! notifications, accounts, teacher setup, and the RGPD endpoints.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hse_api::state::{AppConfig, AppState};
use hse_core::{Role, User};

const SECRET: &str = "s3cret";

/// Seeded accounts plus the state backing the app under test.
struct Rig {
    state: AppState,
    teacher: User,
    other_teacher: User,
    secretary: User,
    principal: User,
    admin: User,
}

impl Rig {
    fn new() -> Self {
        let state = AppState::with_config(AppConfig {
            port: 8080,
            auth_secret: Some(SECRET.to_string()),
        });
        let teacher = User::new("mdupont", "M. Dupont", Role::Teacher);
        let other_teacher = User::new("sbernard", "Mme Bernard", Role::Teacher);
        let secretary = User::new("fmartin", "Mme Martin", Role::Secretary);
        let principal = User::new("plegrand", "M. Legrand", Role::Principal);
        let admin = User::new("ndiallo", "Mme Diallo", Role::Admin);
        for user in [&teacher, &other_teacher, &secretary, &principal, &admin] {
            state.users.insert(*user.id.as_uuid(), (*user).clone());
        }
        Self {
            state,
            teacher,
            other_teacher,
            secretary,
            principal,
            admin,
        }
    }

    fn app(&self) -> axum::Router {
        hse_api::app(self.state.clone())
    }
}

/// Bearer token in the full `{role}:{user_id}:{secret}` form.
fn token(user: &User) -> String {
    format!("Bearer {}:{}:{SECRET}", user.role, user.id.as_uuid())
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Helper: GET `uri` as `user`.
async fn get(
    app: &axum::Router,
    user: &User,
    uri: &str,
) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("Authorization", token(user))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Helper: send `body` to `uri` as `user` with the given method.
async fn send_json(
    app: &axum::Router,
    user: &User,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Authorization", token(user))
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Helper: declare a session for `teacher` and return its JSON.
async fn declare_session(app: &axum::Router, teacher: &User) -> serde_json::Value {
    let response = send_json(
        app,
        teacher,
        "POST",
        "/v1/sessions",
        serde_json::json!({
            "date": "2026-03-12",
            "time_slot": "M2",
            "details": {"type": "extra_hours"},
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let app = Rig::new().app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let app = Rig::new().app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_api_requires_authentication() {
    let app = Rig::new().app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/sessions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let err = body_json(response).await;
    assert_eq!(err["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_wrong_secret_is_rejected() {
    let app = Rig::new().app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/sessions")
                .header("Authorization", "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_spoof_is_rejected() {
    // A teacher claiming the SECRETARY role in the token gets 401, not
    // elevated access.
    let rig = Rig::new();
    let app = rig.app();
    let spoofed = format!("Bearer SECRETARY:{}:{SECRET}", rig.teacher.id.as_uuid());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/sessions")
                .header("Authorization", spoofed)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_legacy_secret_acts_as_bootstrap_admin() {
    // The bare secret must be enough to create the first real account.
    let rig = Rig::new();
    let app = rig.app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/users")
                .header("Authorization", format!("Bearer {SECRET}"))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&serde_json::json!({
                        "username": "rdurand",
                        "display_name": "M. Durand",
                        "role": "TEACHER",
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["username"], "rdurand");
    assert_eq!(created["role"], "TEACHER");
}

// -- Session Declaration ------------------------------------------------------

#[tokio::test]
async fn test_teacher_declares_a_session() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;

    assert_eq!(session["status"], "PENDING_REVIEW");
    assert_eq!(session["teacher_id"], rig.teacher.id.as_uuid().to_string());
    assert_eq!(session["date"], "2026-03-12");
    assert_eq!(session["time_slot"], "M2");
    assert_eq!(session["details"]["type"], "extra_hours");
    assert_eq!(session["transitions"].as_array().unwrap().len(), 0);
    assert!(session["updated_by"].is_null());
}

#[tokio::test]
async fn test_teacher_cannot_declare_for_a_colleague() {
    let rig = Rig::new();
    let app = rig.app();
    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        "/v1/sessions",
        serde_json::json!({
            "teacher_id": rig.other_teacher.id.as_uuid(),
            "date": "2026-03-12",
            "time_slot": "M1",
            "details": {"type": "extra_hours"},
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_secretary_declares_on_behalf() {
    let rig = Rig::new();
    let app = rig.app();
    let response = send_json(
        &app,
        &rig.secretary,
        "POST",
        "/v1/sessions",
        serde_json::json!({
            "teacher_id": rig.teacher.id.as_uuid(),
            "date": "2026-03-13",
            "time_slot": "A1",
            "details": {"type": "replacement", "replaced_teacher": "M. Petit", "class_name": "4e B"},
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let session = body_json(response).await;
    assert_eq!(session["teacher_id"], rig.teacher.id.as_uuid().to_string());
    assert_eq!(session["details"]["class_name"], "4e B");
}

#[tokio::test]
async fn test_invalid_details_rejected_with_field_breakdown() {
    let rig = Rig::new();
    let app = rig.app();
    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        "/v1/sessions",
        serde_json::json!({
            "date": "2026-03-12",
            "time_slot": "M1",
            "details": {"type": "homework_supervision", "student_count": 0, "grade": ""},
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err = body_json(response).await;
    assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
    let details = err["error"]["details"].as_array().unwrap();
    let fields: Vec<&str> = details.iter().map(|d| d["field"].as_str().unwrap()).collect();
    assert!(fields.contains(&"details.student_count"));
    assert!(fields.contains(&"details.grade"));
}

#[tokio::test]
async fn test_unknown_body_field_rejected() {
    let rig = Rig::new();
    let app = rig.app();
    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        "/v1/sessions",
        serde_json::json!({
            "date": "2026-03-12",
            "time_slot": "M1",
            "details": {"type": "extra_hours"},
            "surprise": true,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err = body_json(response).await;
    assert_eq!(err["error"]["code"], "BAD_REQUEST");
}

// -- Session Visibility -------------------------------------------------------

#[tokio::test]
async fn test_teacher_sees_only_own_sessions() {
    let rig = Rig::new();
    let app = rig.app();
    declare_session(&app, &rig.teacher).await;
    declare_session(&app, &rig.other_teacher).await;

    let response = get(&app, &rig.teacher, "/v1/sessions").await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(
        listing["sessions"][0]["teacher_id"],
        rig.teacher.id.as_uuid().to_string()
    );
}

#[tokio::test]
async fn test_staff_see_all_sessions() {
    let rig = Rig::new();
    let app = rig.app();
    declare_session(&app, &rig.teacher).await;
    declare_session(&app, &rig.other_teacher).await;

    for staff in [&rig.secretary, &rig.principal, &rig.admin] {
        let response = get(&app, staff, "/v1/sessions").await;
        let listing = body_json(response).await;
        assert_eq!(listing["total"], 2, "{} should see both", staff.username);
    }
}

#[tokio::test]
async fn test_status_filter_narrows_the_listing() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    // Secretary forwards one of the two.
    let response = send_json(
        &app,
        &rig.secretary,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "PENDING_VALIDATION"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, &rig.teacher, "/v1/sessions?status=PENDING_VALIDATION").await;
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["sessions"][0]["id"], id);
}

#[tokio::test]
async fn test_foreign_session_reads_as_absent() {
    // IDOR probe: another teacher's session answers 404, not 403.
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    let response = get(&app, &rig.other_teacher, &format!("/v1/sessions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let err = body_json(response).await;
    assert_eq!(err["error"]["code"], "NOT_FOUND");
}

// -- Session Lifecycle --------------------------------------------------------

#[tokio::test]
async fn test_teacher_corrects_fields_inside_the_window() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    let response = send_json(
        &app,
        &rig.teacher,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"time_slot": "A3"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["time_slot"], "A3");
    assert_eq!(updated["status"], "PENDING_REVIEW");
    assert_eq!(updated["updated_by"], rig.teacher.display_name);
}

#[tokio::test]
async fn test_teacher_cannot_change_status() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    let response = send_json(
        &app,
        &rig.teacher,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "VALIDATED"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let err = body_json(response).await;
    assert_eq!(err["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_secretary_cannot_validate_directly() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    let response = send_json(
        &app,
        &rig.secretary,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "VALIDATED"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rejection_records_the_comment() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    let response = send_json(
        &app,
        &rig.secretary,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "REJECTED", "comment": "doublon de la séance du 12/03"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let rejected = body_json(response).await;
    assert_eq!(rejected["status"], "REJECTED");
    assert_eq!(rejected["comment"], "doublon de la séance du 12/03");
    let transitions = rejected["transitions"].as_array().unwrap();
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0]["from_status"], "PENDING_REVIEW");
    assert_eq!(transitions[0]["to_status"], "REJECTED");
    assert_eq!(transitions[0]["actor"], rig.secretary.display_name);
}

#[tokio::test]
async fn test_teacher_withdraws_own_fresh_declaration() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/sessions/{id}"))
                .header("Authorization", token(&rig.teacher))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &rig.teacher, &format!("/v1/sessions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviewers_cannot_delete() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    for reviewer in [&rig.secretary, &rig.principal] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/v1/sessions/{id}"))
                    .header("Authorization", token(reviewer))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::FORBIDDEN,
            "{} deleted a session",
            reviewer.username
        );
    }
}

// -- Edit Window --------------------------------------------------------------

#[tokio::test]
async fn test_edit_status_reports_an_open_window() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    let response = get(&app, &rig.teacher, &format!("/v1/sessions/{id}/edit-status")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["is_editable"], true);
    assert_eq!(report["edit_window_minutes"], 60);
    assert_eq!(report["elapsed_minutes"], 0);
    assert_eq!(report["remaining_minutes"], 60);
}

#[tokio::test]
async fn test_edit_status_reads_the_window_setting_fresh() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    // Admin widens the window; the next report must see it.
    let response = send_json(
        &app,
        &rig.admin,
        "PUT",
        "/v1/settings/SESSION_EDIT_WINDOW",
        serde_json::json!({"value": "120"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, &rig.teacher, &format!("/v1/sessions/{id}/edit-status")).await;
    let report = body_json(response).await;
    assert_eq!(report["edit_window_minutes"], 120);
    assert_eq!(report["remaining_minutes"], 120);
}

// -- Attachments --------------------------------------------------------------

#[tokio::test]
async fn test_attachment_register_list_and_review() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    // Teacher registers a supporting document.
    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        &format!("/v1/sessions/{id}/attachments"),
        serde_json::json!({
            "file_name": "convocation.pdf",
            "content_type": "application/pdf",
            "size_bytes": 48213,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let attachment = body_json(response).await;
    assert_eq!(attachment["file_name"], "convocation.pdf");
    assert_eq!(attachment["verified"], false);
    assert_eq!(attachment["archived"], false);
    let attachment_id = attachment["id"].as_str().unwrap().to_string();

    // It shows up on the session.
    let response = get(&app, &rig.teacher, &format!("/v1/sessions/{id}/attachments")).await;
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 1);

    // Secretary verifies it.
    let response = send_json(
        &app,
        &rig.secretary,
        "PATCH",
        &format!("/v1/attachments/{attachment_id}"),
        serde_json::json!({"verified": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let reviewed = body_json(response).await;
    assert_eq!(reviewed["verified"], true);
    assert_eq!(reviewed["archived"], false);
}

#[tokio::test]
async fn test_attachment_review_is_reviewer_only() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        &format!("/v1/sessions/{id}/attachments"),
        serde_json::json!({
            "file_name": "justificatif.pdf",
            "content_type": "application/pdf",
            "size_bytes": 1024,
        }),
    )
    .await;
    let attachment = body_json(response).await;
    let attachment_id = attachment["id"].as_str().unwrap();

    // Neither the owning teacher nor the admin may set review flags.
    for actor in [&rig.teacher, &rig.admin] {
        let response = send_json(
            &app,
            actor,
            "PATCH",
            &format!("/v1/attachments/{attachment_id}"),
            serde_json::json!({"verified": true}),
        )
        .await;
        assert_eq!(
            response.status(),
            StatusCode::FORBIDDEN,
            "{} set review flags",
            actor.username
        );
    }
}

#[tokio::test]
async fn test_empty_file_name_rejected() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        &format!("/v1/sessions/{id}/attachments"),
        serde_json::json!({
            "file_name": "  ",
            "content_type": "application/pdf",
            "size_bytes": 1024,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// -- Settings -----------------------------------------------------------------

#[tokio::test]
async fn test_settings_list_materializes_the_known_keys() {
    let rig = Rig::new();
    let app = rig.app();
    let response = get(&app, &rig.secretary, "/v1/settings").await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 2);
    let keys: Vec<&str> = listing["settings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["key"].as_str().unwrap())
        .collect();
    assert!(keys.contains(&"SESSION_EDIT_WINDOW"));
    assert!(keys.contains(&"DATA_RETENTION_YEARS"));
}

#[tokio::test]
async fn test_settings_are_staff_only() {
    let rig = Rig::new();
    let app = rig.app();
    let response = get(&app, &rig.teacher, "/v1/settings").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_setting_read_returns_the_default_before_first_write() {
    let rig = Rig::new();
    let app = rig.app();
    let response = get(&app, &rig.principal, "/v1/settings/SESSION_EDIT_WINDOW").await;
    assert_eq!(response.status(), StatusCode::OK);
    let setting = body_json(response).await;
    assert_eq!(setting["key"], "SESSION_EDIT_WINDOW");
    assert_eq!(setting["value"], "60");
    assert!(setting.get("updated_by").is_none() || setting["updated_by"].is_null());
}

#[tokio::test]
async fn test_setting_write_is_admin_only() {
    let rig = Rig::new();
    let app = rig.app();
    for actor in [&rig.teacher, &rig.secretary, &rig.principal] {
        let response = send_json(
            &app,
            actor,
            "PUT",
            "/v1/settings/SESSION_EDIT_WINDOW",
            serde_json::json!({"value": "90"}),
        )
        .await;
        assert_eq!(
            response.status(),
            StatusCode::FORBIDDEN,
            "{} wrote a setting",
            actor.username
        );
    }
}

#[tokio::test]
async fn test_setting_write_requires_a_positive_integer() {
    let rig = Rig::new();
    let app = rig.app();
    for bad in ["abc", "0", "-3", "4.5", ""] {
        let response = send_json(
            &app,
            &rig.admin,
            "PUT",
            "/v1/settings/DATA_RETENTION_YEARS",
            serde_json::json!({"value": bad}),
        )
        .await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "value {bad:?} was accepted"
        );
    }
}

#[tokio::test]
async fn test_unknown_setting_key_is_404() {
    let rig = Rig::new();
    let app = rig.app();

    let response = get(&app, &rig.admin, "/v1/settings/NO_SUCH_KEY").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json(
        &app,
        &rig.admin,
        "PUT",
        "/v1/settings/NO_SUCH_KEY",
        serde_json::json!({"value": "7"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_setting_update_stamps_the_actor() {
    let rig = Rig::new();
    let app = rig.app();
    let response = send_json(
        &app,
        &rig.admin,
        "PUT",
        "/v1/settings/DATA_RETENTION_YEARS",
        serde_json::json!({"value": "7"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let setting = body_json(response).await;
    assert_eq!(setting["value"], "7");
    assert_eq!(setting["updated_by"], rig.admin.display_name);
}

// -- Notifications ------------------------------------------------------------

#[tokio::test]
async fn test_status_change_notifies_the_owner() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    send_json(
        &app,
        &rig.secretary,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "PENDING_VALIDATION"}),
    )
    .await;

    let response = get(&app, &rig.teacher, "/v1/notifications").await;
    let inbox = body_json(response).await;
    assert_eq!(inbox["total"], 1);
    let notification = &inbox["notifications"][0];
    assert_eq!(notification["session_id"], id);
    assert_eq!(notification["status"], "PENDING_VALIDATION");
    assert_eq!(notification["read"], false);

    // Nothing for the colleague.
    let response = get(&app, &rig.other_teacher, "/v1/notifications").await;
    assert_eq!(body_json(response).await["total"], 0);
}

#[tokio::test]
async fn test_mark_read_and_unread_filter() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    send_json(
        &app,
        &rig.secretary,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "PENDING_VALIDATION"}),
    )
    .await;
    send_json(
        &app,
        &rig.principal,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "VALIDATED"}),
    )
    .await;

    let response = get(&app, &rig.teacher, "/v1/notifications").await;
    let inbox = body_json(response).await;
    assert_eq!(inbox["total"], 2);
    // Newest first.
    assert_eq!(inbox["notifications"][0]["status"], "VALIDATED");
    let first_id = inbox["notifications"][0]["id"].as_str().unwrap().to_string();

    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        &format!("/v1/notifications/{first_id}/read"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["read"], true);

    let response = get(&app, &rig.teacher, "/v1/notifications?unread=true").await;
    let unread = body_json(response).await;
    assert_eq!(unread["total"], 1);
    assert_eq!(unread["notifications"][0]["status"], "PENDING_VALIDATION");
}

#[tokio::test]
async fn test_cannot_mark_a_foreign_notification_read() {
    let rig = Rig::new();
    let app = rig.app();
    let session = declare_session(&app, &rig.teacher).await;
    let id = session["id"].as_str().unwrap();

    send_json(
        &app,
        &rig.secretary,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "PENDING_VALIDATION"}),
    )
    .await;

    let response = get(&app, &rig.teacher, "/v1/notifications").await;
    let notification_id = body_json(response).await["notifications"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = send_json(
        &app,
        &rig.other_teacher,
        "POST",
        &format!("/v1/notifications/{notification_id}/read"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Users --------------------------------------------------------------------

#[tokio::test]
async fn test_user_creation_is_admin_only() {
    let rig = Rig::new();
    let app = rig.app();
    for actor in [&rig.teacher, &rig.secretary, &rig.principal] {
        let response = send_json(
            &app,
            actor,
            "POST",
            "/v1/users",
            serde_json::json!({
                "username": "new",
                "display_name": "Nouveau",
                "role": "TEACHER",
            }),
        )
        .await;
        assert_eq!(
            response.status(),
            StatusCode::FORBIDDEN,
            "{} created a user",
            actor.username
        );
    }
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let rig = Rig::new();
    let app = rig.app();
    let response = send_json(
        &app,
        &rig.admin,
        "POST",
        "/v1/users",
        serde_json::json!({
            "username": "mdupont",
            "display_name": "Imposteur",
            "role": "TEACHER",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let err = body_json(response).await;
    assert_eq!(err["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_user_responses_never_carry_credentials() {
    let rig = Rig::new();
    let app = rig.app();
    let response = get(&app, &rig.secretary, "/v1/users").await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["total"], 5);
    for user in listing["users"].as_array().unwrap() {
        assert!(user.get("password_hash").is_none());
    }
}

#[tokio::test]
async fn test_teacher_reads_self_but_not_colleagues() {
    let rig = Rig::new();
    let app = rig.app();

    let own = format!("/v1/users/{}", rig.teacher.id.as_uuid());
    let response = get(&app, &rig.teacher, &own).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "mdupont");

    let foreign = format!("/v1/users/{}", rig.other_teacher.id.as_uuid());
    let response = get(&app, &rig.teacher, &foreign).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Teacher Setup ------------------------------------------------------------

#[tokio::test]
async fn test_setup_write_and_read_back() {
    let rig = Rig::new();
    let app = rig.app();
    let uri = format!("/v1/teachers/{}/setup", rig.teacher.id.as_uuid());

    let response = send_json(
        &app,
        &rig.teacher,
        "PUT",
        &uri,
        serde_json::json!({"school_year": "2025-2026", "weekly_quota_hours": 4}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, &rig.teacher, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let setup = body_json(response).await;
    assert_eq!(setup["school_year"], "2025-2026");
    assert_eq!(setup["weekly_quota_hours"], 4);
}

#[tokio::test]
async fn test_setup_is_self_or_admin() {
    let rig = Rig::new();
    let app = rig.app();
    let uri = format!("/v1/teachers/{}/setup", rig.teacher.id.as_uuid());
    let body = serde_json::json!({"school_year": "2025-2026", "weekly_quota_hours": 2});

    for actor in [&rig.other_teacher, &rig.secretary, &rig.principal] {
        let response = send_json(&app, actor, "PUT", &uri, body.clone()).await;
        assert_eq!(
            response.status(),
            StatusCode::FORBIDDEN,
            "{} wrote the setup",
            actor.username
        );
    }

    let response = send_json(&app, &rig.admin, "PUT", &uri, body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_setup_requires_a_teacher_target() {
    let rig = Rig::new();
    let app = rig.app();
    let uri = format!("/v1/teachers/{}/setup", rig.secretary.id.as_uuid());

    let response = send_json(
        &app,
        &rig.admin,
        "PUT",
        &uri,
        serde_json::json!({"school_year": "2025-2026", "weekly_quota_hours": 2}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_oversized_quota_rejected() {
    let rig = Rig::new();
    let app = rig.app();
    let uri = format!("/v1/teachers/{}/setup", rig.teacher.id.as_uuid());

    let response = send_json(
        &app,
        &rig.teacher,
        "PUT",
        &uri,
        serde_json::json!({"school_year": "2025-2026", "weekly_quota_hours": 31}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err = body_json(response).await;
    let details = err["error"]["details"].as_array().unwrap();
    assert_eq!(details[0]["field"], "weekly_quota_hours");
}

#[tokio::test]
async fn test_missing_setup_is_404() {
    let rig = Rig::new();
    let app = rig.app();
    let uri = format!("/v1/teachers/{}/setup", rig.teacher.id.as_uuid());
    let response = get(&app, &rig.teacher, &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Privacy ------------------------------------------------------------------

#[tokio::test]
async fn test_erasure_blocked_by_in_flight_sessions() {
    let rig = Rig::new();
    let app = rig.app();
    declare_session(&app, &rig.teacher).await;

    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        "/v1/privacy/erasure",
        serde_json::json!({
            "user_id": rig.teacher.id.as_uuid(),
            "reason": "départ de l'établissement",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let err = body_json(response).await;
    assert_eq!(err["error"]["code"], "RETENTION_BLOCKED");
    assert!(err["error"]["message"]
        .as_str()
        .unwrap()
        .contains("PENDING_REVIEW"));
}

#[tokio::test]
async fn test_erasure_cascade_removes_every_trace() {
    let rig = Rig::new();
    let app = rig.app();

    // A setup row but no sessions: nothing retained, erasure may run.
    let uri = format!("/v1/teachers/{}/setup", rig.other_teacher.id.as_uuid());
    send_json(
        &app,
        &rig.other_teacher,
        "PUT",
        &uri,
        serde_json::json!({"school_year": "2025-2026", "weekly_quota_hours": 2}),
    )
    .await;

    let response = send_json(
        &app,
        &rig.other_teacher,
        "POST",
        "/v1/privacy/erasure",
        serde_json::json!({
            "user_id": rig.other_teacher.id.as_uuid(),
            "reason": "compte jamais utilisé",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["sessions_removed"], 0);
    assert_eq!(report["setup_removed"], true);
    assert_eq!(report["reason"], "compte jamais utilisé");

    // The account is gone.
    let response = get(
        &app,
        &rig.admin,
        &format!("/v1/users/{}", rig.other_teacher.id.as_uuid()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_erasure_is_subject_or_admin() {
    let rig = Rig::new();
    let app = rig.app();

    // A colleague cannot erase someone else.
    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        "/v1/privacy/erasure",
        serde_json::json!({
            "user_id": rig.other_teacher.id.as_uuid(),
            "reason": "essai",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The admin can, on the subject's behalf.
    let response = send_json(
        &app,
        &rig.admin,
        "POST",
        "/v1/privacy/erasure",
        serde_json::json!({
            "user_id": rig.other_teacher.id.as_uuid(),
            "reason": "demande écrite du 12/03",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_export_carries_the_legal_framing() {
    let rig = Rig::new();
    let app = rig.app();
    declare_session(&app, &rig.teacher).await;

    let response = get(
        &app,
        &rig.teacher,
        &format!("/v1/privacy/export/{}", rig.teacher.id.as_uuid()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bundle = body_json(response).await;
    assert_eq!(bundle["user"]["username"], "mdupont");
    assert!(bundle["user"].get("password_hash").is_none());
    assert_eq!(bundle["sessions"].as_array().unwrap().len(), 1);
    assert!(bundle["legal_basis"].as_str().unwrap().contains("RGPD"));
    assert!(bundle["retention_policy"].as_str().unwrap().contains('5'));
}

#[tokio::test]
async fn test_export_is_subject_or_admin() {
    let rig = Rig::new();
    let app = rig.app();

    let foreign = format!("/v1/privacy/export/{}", rig.teacher.id.as_uuid());
    let response = get(&app, &rig.other_teacher, &foreign).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(&app, &rig.admin, &foreign).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_json_served() {
    let rig = Rig::new();
    let app = rig.app();
    let response = get(&app, &rig.admin, "/v1/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let spec = body_json(response).await;
    assert!(spec["openapi"].is_string());
    assert_eq!(spec["info"]["title"], "HSE Declare API");
    assert!(spec["paths"]["/v1/sessions"].is_object());
}

// -- Full Lifecycle -----------------------------------------------------------

#[tokio::test]
async fn test_full_declaration_to_payment_flow() {
    let rig = Rig::new();
    let app = rig.app();

    // ── Step 1: Teacher declares a replacement ───────────────────
    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        "/v1/sessions",
        serde_json::json!({
            "date": "2026-03-12",
            "time_slot": "M2",
            "details": {"type": "replacement", "replaced_teacher": "M. Petit", "class_name": "4e B"},
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let session = body_json(response).await;
    let id = session["id"].as_str().unwrap().to_string();
    assert_eq!(session["status"], "PENDING_REVIEW");

    // ── Step 2: Secretary forwards it for validation ─────────────
    let response = send_json(
        &app,
        &rig.secretary,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "PENDING_VALIDATION"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "PENDING_VALIDATION");

    // ── Step 3: Principal validates ──────────────────────────────
    let response = send_json(
        &app,
        &rig.principal,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "VALIDATED", "comment": "conforme à l'emploi du temps"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let validated = body_json(response).await;
    assert_eq!(validated["status"], "VALIDATED");
    assert_eq!(validated["comment"], "conforme à l'emploi du temps");

    // ── Step 4: Secretary marks it paid ──────────────────────────
    let response = send_json(
        &app,
        &rig.secretary,
        "PATCH",
        &format!("/v1/sessions/{id}"),
        serde_json::json!({"status": "PAID"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "PAID");

    // ── Step 5: The audit trail tells the whole story ────────────
    let response = get(&app, &rig.teacher, &format!("/v1/sessions/{id}/transitions")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let trail = body_json(response).await;
    assert_eq!(trail["status"], "PAID");
    let transitions = trail["transitions"].as_array().unwrap();
    assert_eq!(trail["total"], 3);
    assert_eq!(transitions[0]["from_status"], "PENDING_REVIEW");
    assert_eq!(transitions[0]["to_status"], "PENDING_VALIDATION");
    assert_eq!(transitions[0]["actor"], rig.secretary.display_name);
    assert_eq!(transitions[1]["to_status"], "VALIDATED");
    assert_eq!(transitions[1]["actor"], rig.principal.display_name);
    assert_eq!(transitions[2]["to_status"], "PAID");
    assert_eq!(transitions[2]["actor"], rig.secretary.display_name);

    // ── Step 6: The teacher was notified at every stage ──────────
    let response = get(&app, &rig.teacher, "/v1/notifications").await;
    let inbox = body_json(response).await;
    assert_eq!(inbox["total"], 3);
    assert_eq!(inbox["notifications"][0]["status"], "PAID");

    // ── Step 7: Paid sessions are pinned by the retention clock ──
    let response = send_json(
        &app,
        &rig.teacher,
        "POST",
        "/v1/privacy/erasure",
        serde_json::json!({
            "user_id": rig.teacher.id.as_uuid(),
            "reason": "départ de l'établissement",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let err = body_json(response).await;
    assert_eq!(err["error"]["code"], "RETENTION_BLOCKED");
    assert!(err["error"]["message"]
        .as_str()
        .unwrap()
        .contains("retention period"));

    // ── Step 8: But the data walks out the door on request ───────
    let response = get(
        &app,
        &rig.teacher,
        &format!("/v1/privacy/export/{}", rig.teacher.id.as_uuid()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bundle = body_json(response).await;
    let exported = &bundle["sessions"].as_array().unwrap()[0];
    assert_eq!(exported["id"], id.as_str());
    assert_eq!(exported["transitions"].as_array().unwrap().len(), 3);
}
