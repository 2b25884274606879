//! # Lifecycle Engine
//!
//! The orchestrator behind every session operation: it loads, asks the
//! [gate](crate::gate) for a verdict, applies the mutation, and tells
//! registered listeners when a status actually changed. Handlers stay
//! thin; policy lives here and in the gate.
//!
//! ## Atomicity
//!
//! Authorization and write happen inside one [`Store::try_update`]
//! closure, under a single write lock. Two concurrent updates to the
//! same session therefore serialize: the second closure runs against
//! the freshly written status and is re-judged on it — it can lose with
//! a fresh denial, but it can never overwrite blind.
//!
//! ## Events
//!
//! A committed status change produces exactly one [`StatusChanged`]
//! event, delivered to listeners after the lock is released. Listener
//! behavior never affects the outcome of the mutation that triggered
//! it; a no-op update produces no event at all.
//!
//! ## Design
//!
//! All collaborators are constructor-injected. Nothing in this module
//! reaches for process-wide state, so a test can stand up a complete
//! engine from empty stores in a few lines.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use hse_core::{AttachmentId, Role, SessionId, TimeSlot, Timestamp, User, UserId};
use hse_state::{
    Attachment, FieldError, Session, SessionChanges, SessionDetails, SessionStatus,
};

use crate::error::EngineError;
use crate::gate::{self, DenyReason, SessionMutation};
use crate::settings::SettingsStore;
use crate::store::{AttachmentStore, SessionStore, UserStore};
use crate::window::edit_window;

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// Input for declaring a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    /// Owning teacher. A teacher declares for themself; staff may
    /// declare on a teacher's behalf.
    pub teacher_id: UserId,
    /// Calendar date of the duty.
    pub date: NaiveDate,
    /// Slot within the day.
    pub time_slot: TimeSlot,
    /// Kind-specific payload.
    pub details: SessionDetails,
}

/// The edit-window report for one session, answered to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditStatusReport {
    /// Whether self-service editing is currently open.
    pub is_editable: bool,
    /// The configured window, as read at evaluation time.
    pub edit_window_minutes: i64,
    /// Whole minutes since creation.
    pub elapsed_minutes: i64,
    /// Whole minutes of window left (zero once expired).
    pub remaining_minutes: i64,
}

/// Domain event: a session's status changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChanged {
    /// The session after the transition.
    pub session: Session,
    /// Status before.
    pub previous: SessionStatus,
    /// Status after.
    pub new_status: SessionStatus,
    /// Comment attached to the decision, if any.
    pub comment: Option<String>,
}

/// Consumer of [`StatusChanged`] events.
///
/// Listeners run after the mutation has committed and must not panic;
/// whatever they do (or fail to do) the status change stands.
pub trait StatusChangedListener: Send + Sync {
    /// Called once per committed status change.
    fn on_status_changed(&self, event: &StatusChanged);
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The session lifecycle engine.
#[derive(Clone)]
pub struct LifecycleEngine {
    sessions: SessionStore,
    users: UserStore,
    attachments: AttachmentStore,
    settings: SettingsStore,
    listeners: Vec<Arc<dyn StatusChangedListener>>,
}

impl LifecycleEngine {
    /// Build an engine over the given stores, with no listeners.
    pub fn new(
        sessions: SessionStore,
        users: UserStore,
        attachments: AttachmentStore,
        settings: SettingsStore,
    ) -> Self {
        Self {
            sessions,
            users,
            attachments,
            settings,
            listeners: Vec::new(),
        }
    }

    /// Attach a status-change listener. Listeners are called in
    /// registration order.
    pub fn with_listener(mut self, listener: Arc<dyn StatusChangedListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    // ── Declaration ──────────────────────────────────────────────

    /// Declare a new session in `PENDING_REVIEW`.
    ///
    /// A teacher declares only for themself; secretary, principal, and
    /// admin may declare on any teacher's behalf. The owning account
    /// must exist and hold the TEACHER role.
    pub fn create(&self, actor: &User, new: NewSession) -> Result<Session, EngineError> {
        if actor.role == Role::Teacher && new.teacher_id != actor.id {
            return Err(DenyReason::NotOwner.into());
        }

        let errors = new.details.validate();
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }

        let owner = self
            .users
            .get(new.teacher_id.as_uuid())
            .ok_or_else(|| EngineError::user_not_found(*new.teacher_id.as_uuid()))?;
        if owner.role != Role::Teacher {
            return Err(EngineError::Validation(vec![FieldError::new(
                "teacher_id",
                "sessions can only be declared for teacher accounts",
            )]));
        }

        let session = Session::declare(new.teacher_id, new.date, new.time_slot, new.details);
        self.sessions.insert(*session.id.as_uuid(), session.clone());
        info!(
            session = %session.id,
            teacher = %owner.display_name,
            kind = %session.kind(),
            "session declared"
        );
        Ok(session)
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Fetch one session. Teachers see only their own; a foreign
    /// session reads as absent rather than revealing its existence.
    pub fn get(&self, actor: &User, id: SessionId) -> Result<Session, EngineError> {
        let session = self
            .sessions
            .get(id.as_uuid())
            .ok_or_else(|| EngineError::session_not_found(*id.as_uuid()))?;
        if actor.role == Role::Teacher && session.teacher_id != actor.id {
            return Err(EngineError::session_not_found(*id.as_uuid()));
        }
        Ok(session)
    }

    /// List visible sessions, newest first, optionally filtered by
    /// status.
    pub fn list(&self, actor: &User, status: Option<SessionStatus>) -> Vec<Session> {
        let mut sessions: Vec<Session> = self
            .sessions
            .list()
            .into_iter()
            .filter(|s| actor.role.is_staff() || s.teacher_id == actor.id)
            .filter(|s| status.map_or(true, |wanted| s.status == wanted))
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions
    }

    /// The edit-window report for a session, with the same visibility
    /// rule as [`LifecycleEngine::get`].
    pub fn edit_status(&self, actor: &User, id: SessionId) -> Result<EditStatusReport, EngineError> {
        let session = self.get(actor, id)?;
        let window_minutes = self.settings.edit_window_minutes();
        let report = edit_window(session.created_at, Timestamp::now(), window_minutes);
        let is_editable = match session.status {
            SessionStatus::PendingReview => report.allowed,
            SessionStatus::PendingDocuments => true,
            _ => false,
        };
        Ok(EditStatusReport {
            is_editable,
            edit_window_minutes: window_minutes,
            elapsed_minutes: report.elapsed_minutes,
            remaining_minutes: report.remaining_minutes,
        })
    }

    // ── Mutation ─────────────────────────────────────────────────

    /// Apply a changeset to a session.
    ///
    /// One authorization decision covers the whole changeset; an
    /// illegal status change rejects the field edits bundled with it.
    /// An empty changeset succeeds without touching the record and
    /// without emitting an event.
    pub fn update(
        &self,
        actor: &User,
        id: SessionId,
        changes: SessionChanges,
    ) -> Result<Session, EngineError> {
        let errors = changes.validate();
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }

        let mut event: Option<StatusChanged> = None;
        let result = self.sessions.try_update(id.as_uuid(), |session| {
            // Clock and window are read here, inside the lock: the
            // verdict, the freshest settings, and the write all see the
            // same session state.
            let now = Timestamp::now();
            let window = self.settings.edit_window_minutes();
            gate::authorize(actor, session, &SessionMutation::Update(&changes), now, window)?;

            if changes.is_empty() {
                return Ok(session.clone());
            }

            let previous = session.status;
            if changes.has_field_edits() {
                session.apply_changes(&changes, &actor.display_name);
            }
            if let Some(target) = changes.status_change(previous) {
                session.transition(target, &actor.display_name, changes.comment.clone())?;
                event = Some(StatusChanged {
                    session: session.clone(),
                    previous,
                    new_status: target,
                    comment: changes.comment.clone(),
                });
            }
            Ok(session.clone())
        });

        match result {
            None => Err(EngineError::session_not_found(*id.as_uuid())),
            Some(Err(e)) => {
                debug!(session = %id, actor = %actor.display_name, error = %e, "session update refused");
                Err(e)
            }
            Some(Ok(session)) => {
                if let Some(event) = event {
                    info!(
                        session = %session.id,
                        from = %event.previous,
                        to = %event.new_status,
                        by = %actor.display_name,
                        "session status changed"
                    );
                    self.emit(&event);
                }
                Ok(session)
            }
        }
    }

    /// Delete a session, cascading to its attachments.
    pub fn delete(&self, actor: &User, id: SessionId) -> Result<(), EngineError> {
        let result = self.sessions.remove_if(id.as_uuid(), |session| {
            let now = Timestamp::now();
            let window = self.settings.edit_window_minutes();
            gate::authorize(actor, session, &SessionMutation::Delete, now, window)?;
            Ok::<(), EngineError>(())
        });

        match result {
            None => Err(EngineError::session_not_found(*id.as_uuid())),
            Some(Err(e)) => {
                debug!(session = %id, actor = %actor.display_name, error = %e, "session delete refused");
                Err(e)
            }
            Some(Ok(removed)) => {
                let orphaned: Vec<Uuid> = self
                    .attachments
                    .list()
                    .into_iter()
                    .filter(|a| a.session_id == removed.id)
                    .map(|a| *a.id.as_uuid())
                    .collect();
                for attachment_id in &orphaned {
                    self.attachments.remove(attachment_id);
                }
                info!(
                    session = %removed.id,
                    by = %actor.display_name,
                    attachments = orphaned.len(),
                    "session deleted"
                );
                Ok(())
            }
        }
    }

    // ── Attachments ──────────────────────────────────────────────

    /// Register uploaded file metadata against a session. Same
    /// visibility as [`LifecycleEngine::get`].
    pub fn add_attachment(
        &self,
        actor: &User,
        session_id: SessionId,
        file_name: String,
        content_type: String,
        size_bytes: u64,
    ) -> Result<Attachment, EngineError> {
        let session = self.get(actor, session_id)?;
        if file_name.trim().is_empty() {
            return Err(EngineError::Validation(vec![FieldError::new(
                "file_name",
                "file name must not be empty",
            )]));
        }
        let attachment = Attachment::new(session.id, file_name, content_type, size_bytes, actor.id);
        self.attachments
            .insert(*attachment.id.as_uuid(), attachment.clone());
        debug!(session = %session.id, attachment = %attachment.id, "attachment registered");
        Ok(attachment)
    }

    /// List a session's attachments, oldest first.
    pub fn list_attachments(
        &self,
        actor: &User,
        session_id: SessionId,
    ) -> Result<Vec<Attachment>, EngineError> {
        let session = self.get(actor, session_id)?;
        let mut attachments: Vec<Attachment> = self
            .attachments
            .list()
            .into_iter()
            .filter(|a| a.session_id == session.id)
            .collect();
        attachments.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at));
        Ok(attachments)
    }

    /// Set the verification/archival flags on an attachment.
    /// Reviewer-only (secretary, principal).
    pub fn review_attachment(
        &self,
        actor: &User,
        id: AttachmentId,
        verified: Option<bool>,
        archived: Option<bool>,
    ) -> Result<Attachment, EngineError> {
        if !actor.role.is_reviewer() {
            return Err(DenyReason::AttachmentReviewNotAllowed { role: actor.role }.into());
        }
        self.attachments
            .update(id.as_uuid(), |attachment| {
                if let Some(v) = verified {
                    attachment.verified = v;
                }
                if let Some(a) = archived {
                    attachment.archived = a;
                }
            })
            .ok_or(EngineError::NotFound {
                what: "attachment",
                id: *id.as_uuid(),
            })
    }

    // ── Events ───────────────────────────────────────────────────

    fn emit(&self, event: &StatusChanged) {
        for listener in &self.listeners {
            listener.on_status_changed(event);
        }
        debug!(
            session = %event.session.id,
            listeners = self.listeners.len(),
            "status change event dispatched"
        );
    }
}

impl std::fmt::Debug for LifecycleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEngine")
            .field("sessions", &self.sessions.len())
            .field("users", &self.users.len())
            .field("attachments", &self.attachments.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
