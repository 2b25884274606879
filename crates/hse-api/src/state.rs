//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Wiring
//!
//! One set of stores backs everything. The lifecycle engine, the
//! notification recorder, and the privacy service all hold clones of the
//! same `Arc`-backed stores, so a mutation through any of them is visible
//! to the others immediately. The recorder is registered as the engine's
//! status listener here; no other component wires itself.

use std::sync::Arc;

use hse_engine::{
    AttachmentStore, LifecycleEngine, SessionStore, SettingsStore, UserStore,
};
use hse_notify::{NotificationRecorder, NotificationStore};
use hse_retention::{PrivacyService, TeacherSetupStore};

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_secret` to prevent credential leakage
/// in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared secret for bearer authentication.
    /// If `None`, authentication is disabled.
    pub auth_secret: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_secret",
                &self.auth_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_secret: None,
        }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly via `Arc` internals in each store; cloning the state
/// clones handles, never data.
#[derive(Debug, Clone)]
pub struct AppState {
    // -- Stores --
    pub users: UserStore,
    pub sessions: SessionStore,
    pub attachments: AttachmentStore,
    pub notifications: NotificationStore,
    pub setups: TeacherSetupStore,
    pub settings: SettingsStore,

    // -- Services over the stores --
    /// The lifecycle engine, with the notification recorder already
    /// registered as its status listener.
    pub engine: LifecycleEngine,
    /// Read/mark surface for in-app notifications. Shares the engine
    /// listener's store.
    pub recorder: NotificationRecorder,
    /// Erasure and export over the full set of personal-data stores.
    pub privacy: PrivacyService,

    // -- Configuration --
    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application state with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let users = UserStore::new();
        let sessions = SessionStore::new();
        let attachments = AttachmentStore::new();
        let notifications = NotificationStore::new();
        let setups = TeacherSetupStore::new();
        let settings = SettingsStore::new();

        let recorder = NotificationRecorder::new(notifications.clone());
        let engine = LifecycleEngine::new(
            sessions.clone(),
            users.clone(),
            attachments.clone(),
            settings.clone(),
        )
        .with_listener(Arc::new(recorder.clone()));
        let privacy = PrivacyService::new(
            users.clone(),
            sessions.clone(),
            attachments.clone(),
            notifications.clone(),
            setups.clone(),
            settings.clone(),
        );

        Self {
            users,
            sessions,
            attachments,
            notifications,
            setups,
            settings,
            engine,
            recorder,
            privacy,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
