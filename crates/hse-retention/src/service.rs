//! # Privacy Service
//!
//! The two subject-rights operations, over every store that holds
//! personal data:
//!
//! - **Erasure** — verdict first, then a cascade in dependency order:
//!   attachments, sessions, notifications, teacher setup, and finally
//!   the user record itself. Deleting the user first would orphan
//!   everything else.
//! - **Export** — the portability bundle from [`crate::export`].
//!
//! Both are callable by the subject user, or by an administrator acting
//! on a written request.

use std::collections::HashSet;

use hse_core::{Role, SessionId, Timestamp, User, UserId};
use hse_engine::{AttachmentStore, SessionStore, SettingsStore, UserStore};
use hse_notify::{Notification, NotificationStore};
use hse_state::Session;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::RetentionError;
use crate::export::{assemble, ExportBundle};
use crate::guard::{DataRetentionGuard, ErasureVerdict};
use crate::setup::TeacherSetupStore;

/// What an executed erasure removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErasureReport {
    /// The erased user.
    pub user_id: UserId,
    /// The reason given with the request, kept for the audit log.
    pub reason: String,
    /// Sessions removed.
    pub sessions_removed: usize,
    /// Attachment records removed.
    pub attachments_removed: usize,
    /// Notifications removed.
    pub notifications_removed: usize,
    /// Whether a teacher-setup row existed and was removed.
    pub setup_removed: bool,
    /// When the cascade ran.
    pub erased_at: Timestamp,
}

/// Erasure and export over the full set of personal-data stores.
#[derive(Clone)]
pub struct PrivacyService {
    users: UserStore,
    sessions: SessionStore,
    attachments: AttachmentStore,
    notifications: NotificationStore,
    setups: TeacherSetupStore,
    settings: SettingsStore,
    guard: DataRetentionGuard,
}

impl PrivacyService {
    /// Build the service. The guard shares the session and settings
    /// stores, so its verdicts always see current data.
    pub fn new(
        users: UserStore,
        sessions: SessionStore,
        attachments: AttachmentStore,
        notifications: NotificationStore,
        setups: TeacherSetupStore,
        settings: SettingsStore,
    ) -> Self {
        let guard = DataRetentionGuard::new(sessions.clone(), settings.clone());
        Self {
            users,
            sessions,
            attachments,
            notifications,
            setups,
            settings,
            guard,
        }
    }

    /// The verdict component, for callers that want the answer without
    /// the action.
    pub fn guard(&self) -> &DataRetentionGuard {
        &self.guard
    }

    /// Erase everything held about `user_id`, if the guard allows it.
    pub fn request_erasure(
        &self,
        actor: &User,
        user_id: UserId,
        reason: &str,
    ) -> Result<ErasureReport, RetentionError> {
        ensure_subject(actor, user_id)?;
        if self.users.get(user_id.as_uuid()).is_none() {
            return Err(RetentionError::UserNotFound(*user_id.as_uuid()));
        }
        if let ErasureVerdict::Denied(denial) = self.guard.can_erase(user_id) {
            debug!(user = %user_id, reason = %denial, "erasure refused");
            return Err(denial.into());
        }

        // Cascade in dependency order.
        let sessions: Vec<Session> = self
            .sessions
            .list()
            .into_iter()
            .filter(|s| s.teacher_id == user_id)
            .collect();
        let session_ids: HashSet<SessionId> = sessions.iter().map(|s| s.id).collect();

        let attachment_ids: Vec<Uuid> = self
            .attachments
            .list()
            .into_iter()
            .filter(|a| session_ids.contains(&a.session_id))
            .map(|a| *a.id.as_uuid())
            .collect();
        for id in &attachment_ids {
            self.attachments.remove(id);
        }
        for session in &sessions {
            self.sessions.remove(session.id.as_uuid());
        }

        let notification_ids: Vec<Uuid> = self
            .notifications
            .list()
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .map(|n| *n.id.as_uuid())
            .collect();
        for id in &notification_ids {
            self.notifications.remove(id);
        }

        let setup_removed = self.setups.remove(user_id.as_uuid()).is_some();
        self.users.remove(user_id.as_uuid());

        let report = ErasureReport {
            user_id,
            reason: reason.to_string(),
            sessions_removed: sessions.len(),
            attachments_removed: attachment_ids.len(),
            notifications_removed: notification_ids.len(),
            setup_removed,
            erased_at: Timestamp::now(),
        };
        info!(
            user = %user_id,
            by = %actor.display_name,
            reason = %reason,
            sessions = report.sessions_removed,
            attachments = report.attachments_removed,
            "erasure executed"
        );
        Ok(report)
    }

    /// Assemble the portability export for `user_id`.
    pub fn export_data(&self, actor: &User, user_id: UserId) -> Result<ExportBundle, RetentionError> {
        ensure_subject(actor, user_id)?;
        let user = self
            .users
            .get(user_id.as_uuid())
            .ok_or(RetentionError::UserNotFound(*user_id.as_uuid()))?;

        let sessions: Vec<Session> = self
            .sessions
            .list()
            .into_iter()
            .filter(|s| s.teacher_id == user_id)
            .collect();
        let session_ids: HashSet<SessionId> = sessions.iter().map(|s| s.id).collect();
        let attachments = self
            .attachments
            .list()
            .into_iter()
            .filter(|a| session_ids.contains(&a.session_id))
            .collect();
        let notifications: Vec<Notification> = self
            .notifications
            .list()
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .collect();
        let setup = self.setups.get(user_id.as_uuid());

        debug!(user = %user_id, sessions = sessions.len(), "export assembled");
        Ok(assemble(
            user,
            setup,
            sessions,
            attachments,
            notifications,
            self.settings.retention_years(),
        ))
    }
}

fn ensure_subject(actor: &User, user_id: UserId) -> Result<(), RetentionError> {
    if actor.id == user_id || actor.role == Role::Admin {
        Ok(())
    } else {
        Err(RetentionError::NotSubject)
    }
}

impl std::fmt::Debug for PrivacyService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivacyService")
            .field("users", &self.users.len())
            .field("sessions", &self.sessions.len())
            .field("attachments", &self.attachments.len())
            .field("notifications", &self.notifications.len())
            .finish()
    }
}
