//! # Notification Recorder
//!
//! The stateful half of the notification pipeline: a listener on the
//! lifecycle engine that renders each committed status change and files
//! the result for the session's owning teacher.
//!
//! Recording is infallible. The in-memory write cannot fail, and a
//! status change must never be held hostage by its side effects; if a
//! status has no rendering there is simply nothing to file.

use hse_core::{NotificationId, SessionId, Timestamp, UserId};
use hse_engine::{StatusChanged, StatusChangedListener, Store};
use hse_state::SessionStatus;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::render::render;

/// One in-app notification, addressed to a session's owning teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier.
    pub id: NotificationId,
    /// Recipient (the session's owning teacher).
    pub user_id: UserId,
    /// The session whose status change produced this.
    pub session_id: SessionId,
    /// The status that produced this.
    pub status: SessionStatus,
    /// Rendered headline.
    pub title: String,
    /// Rendered body.
    pub message: String,
    /// When the status change committed.
    pub created_at: Timestamp,
    /// Whether the recipient has opened it.
    pub read: bool,
}

/// Shared store of notifications.
pub type NotificationStore = Store<Notification>;

/// Listener that records a notification per notifying status change.
#[derive(Debug, Clone)]
pub struct NotificationRecorder {
    notifications: NotificationStore,
}

impl NotificationRecorder {
    /// Build a recorder writing into the given store.
    pub fn new(notifications: NotificationStore) -> Self {
        Self { notifications }
    }

    /// A recipient's notifications, newest first. `unread_only` narrows
    /// to the ones not yet opened.
    pub fn for_user(&self, user_id: UserId, unread_only: bool) -> Vec<Notification> {
        let mut notifications: Vec<Notification> = self
            .notifications
            .list()
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .filter(|n| !unread_only || !n.read)
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications
    }

    /// Mark one of the recipient's notifications as read.
    ///
    /// Someone else's notification reads as absent, the same way a
    /// foreign session does.
    pub fn mark_read(&self, user_id: UserId, id: NotificationId) -> Option<Notification> {
        self.notifications
            .try_update(id.as_uuid(), |notification| {
                if notification.user_id != user_id {
                    return Err(());
                }
                notification.read = true;
                Ok(notification.clone())
            })?
            .ok()
    }
}

impl StatusChangedListener for NotificationRecorder {
    fn on_status_changed(&self, event: &StatusChanged) {
        let Some(content) = render(event.new_status, event.comment.as_deref()) else {
            return;
        };
        let notification = Notification {
            id: NotificationId::new(),
            user_id: event.session.teacher_id,
            session_id: event.session.id,
            status: event.new_status,
            title: content.title,
            message: content.message,
            created_at: Timestamp::now(),
            read: false,
        };
        debug!(
            notification = %notification.id,
            recipient = %notification.user_id,
            status = %notification.status,
            "notification recorded"
        );
        self.notifications
            .insert(*notification.id.as_uuid(), notification);
    }
}
