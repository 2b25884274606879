//! # Session Entity
//!
//! The declared work unit: one teacher, one date, one time slot, one kind
//! of extra duty, moving through the approval pipeline of
//! [`crate::status`]. The entity records every status transition it
//! undergoes in an append-only audit trail.
//!
//! Mutation is split in two deliberately:
//!
//! - [`Session::apply_changes`] merges non-status fields from a
//!   [`SessionChanges`] changeset.
//! - [`Session::transition`] moves the status along a graph edge and
//!   appends a [`TransitionRecord`].
//!
//! Whether a given caller may do either is decided upstream by the
//! authorization gate; the entity enforces only what must hold for every
//! caller (graph edges exist, `created_at` is never rewritten, history is
//! append-only).

use chrono::NaiveDate;
use hse_core::{SessionId, TimeSlot, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use crate::status::{SessionStatus, StateError};

// ---------------------------------------------------------------------------
// Validation report
// ---------------------------------------------------------------------------

/// One field-level problem in a submitted payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field (e.g. `details.student_count`).
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldError {
    /// Build a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session kind and payload
// ---------------------------------------------------------------------------

/// The kind of extra duty being declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Covering an absent colleague's class.
    Replacement,
    /// Supervised homework hour (devoirs faits).
    HomeworkSupervision,
    /// Additional teaching hours beyond the service schedule.
    ExtraHours,
    /// Anything else the school pays by the hour.
    Other,
}

impl SessionKind {
    /// Canonical wire name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Replacement => "replacement",
            SessionKind::HomeworkSupervision => "homework_supervision",
            SessionKind::ExtraHours => "extra_hours",
            SessionKind::Other => "other",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a declaration.
///
/// Tagged by `type` on the wire:
/// `{"type": "replacement", "replaced_teacher": "...", "class_name": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionDetails {
    /// Replacement of an absent colleague.
    Replacement {
        /// Display name of the replaced teacher.
        replaced_teacher: String,
        /// Class taken over (e.g. `"4e B"`).
        class_name: String,
    },
    /// Supervised homework session.
    HomeworkSupervision {
        /// Number of students present.
        student_count: u32,
        /// Grade level supervised (e.g. `"6e"`).
        grade: String,
    },
    /// Extra teaching hours; carries no additional fields.
    ExtraHours,
    /// Free-form paid activity.
    Other {
        /// What the hour was spent on.
        description: String,
    },
}

impl SessionDetails {
    /// The kind this payload belongs to.
    pub fn kind(&self) -> SessionKind {
        match self {
            SessionDetails::Replacement { .. } => SessionKind::Replacement,
            SessionDetails::HomeworkSupervision { .. } => SessionKind::HomeworkSupervision,
            SessionDetails::ExtraHours => SessionKind::ExtraHours,
            SessionDetails::Other { .. } => SessionKind::Other,
        }
    }

    /// Field-by-field validation of the payload. Empty result means valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        match self {
            SessionDetails::Replacement {
                replaced_teacher,
                class_name,
            } => {
                if replaced_teacher.trim().is_empty() {
                    errors.push(FieldError::new(
                        "details.replaced_teacher",
                        "replaced teacher name must not be empty",
                    ));
                }
                if replaced_teacher.len() > 255 {
                    errors.push(FieldError::new(
                        "details.replaced_teacher",
                        "replaced teacher name must not exceed 255 characters",
                    ));
                }
                if class_name.trim().is_empty() {
                    errors.push(FieldError::new(
                        "details.class_name",
                        "class name must not be empty",
                    ));
                }
                if class_name.len() > 64 {
                    errors.push(FieldError::new(
                        "details.class_name",
                        "class name must not exceed 64 characters",
                    ));
                }
            }
            SessionDetails::HomeworkSupervision {
                student_count,
                grade,
            } => {
                if *student_count == 0 {
                    errors.push(FieldError::new(
                        "details.student_count",
                        "student count must be at least 1",
                    ));
                }
                if *student_count > 200 {
                    errors.push(FieldError::new(
                        "details.student_count",
                        "student count must not exceed 200",
                    ));
                }
                if grade.trim().is_empty() {
                    errors.push(FieldError::new("details.grade", "grade must not be empty"));
                }
                if grade.len() > 32 {
                    errors.push(FieldError::new(
                        "details.grade",
                        "grade must not exceed 32 characters",
                    ));
                }
            }
            SessionDetails::ExtraHours => {}
            SessionDetails::Other { description } => {
                if description.trim().is_empty() {
                    errors.push(FieldError::new(
                        "details.description",
                        "description must not be empty",
                    ));
                }
                if description.len() > 2000 {
                    errors.push(FieldError::new(
                        "details.description",
                        "description must not exceed 2000 characters",
                    ));
                }
            }
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Changeset
// ---------------------------------------------------------------------------

/// A partial update to a session. Absent fields are left untouched.
///
/// A changeset that contains both a status change and field edits is one
/// authorization decision: if the status change is denied, none of it is
/// applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionChanges {
    /// New session date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// New time slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<TimeSlot>,
    /// Replacement payload (replaces the whole `details` value).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<SessionDetails>,
    /// Requested target status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    /// Reviewer or declarer comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl SessionChanges {
    /// Whether the changeset contains nothing at all.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.time_slot.is_none()
            && self.details.is_none()
            && self.status.is_none()
            && self.comment.is_none()
    }

    /// Whether any non-status field is being edited.
    pub fn has_field_edits(&self) -> bool {
        self.date.is_some()
            || self.time_slot.is_some()
            || self.details.is_some()
            || self.comment.is_some()
    }

    /// The requested status change, if the changeset asks for a status
    /// different from `current`. Requesting the current status is not a
    /// transition.
    pub fn status_change(&self, current: SessionStatus) -> Option<SessionStatus> {
        match self.status {
            Some(target) if target != current => Some(target),
            _ => None,
        }
    }

    /// Field-by-field validation of the changeset. Empty result means valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(details) = &self.details {
            errors.extend(details.validate());
        }
        if let Some(comment) = &self.comment {
            if comment.len() > 2000 {
                errors.push(FieldError::new(
                    "comment",
                    "comment must not exceed 2000 characters",
                ));
            }
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// Transition audit trail
// ---------------------------------------------------------------------------

/// One recorded status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Status before the transition.
    pub from_status: SessionStatus,
    /// Status after the transition.
    pub to_status: SessionStatus,
    /// When it happened.
    pub timestamp: Timestamp,
    /// Display name of the acting user.
    pub actor: String,
    /// Comment attached to the decision, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A declared extra-duty session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier.
    pub id: SessionId,
    /// Owning teacher. Never reassigned.
    pub teacher_id: UserId,
    /// Calendar date of the duty.
    pub date: NaiveDate,
    /// Slot within the day.
    pub time_slot: TimeSlot,
    /// Kind-specific payload.
    pub details: SessionDetails,
    /// Current approval status.
    pub status: SessionStatus,
    /// Creation instant. Immutable; the sole reference point for the
    /// edit window.
    pub created_at: Timestamp,
    /// Last mutation instant.
    pub updated_at: Timestamp,
    /// Display name of the last mutating user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    /// Comment from the most recent decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Append-only transition history.
    pub transitions: Vec<TransitionRecord>,
}

impl Session {
    /// Declare a new session. Status starts at `PENDING_REVIEW` with an
    /// empty transition history.
    pub fn declare(
        teacher_id: UserId,
        date: NaiveDate,
        time_slot: TimeSlot,
        details: SessionDetails,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            teacher_id,
            date,
            time_slot,
            details,
            status: SessionStatus::PendingReview,
            created_at: now,
            updated_at: now,
            updated_by: None,
            comment: None,
            transitions: Vec::new(),
        }
    }

    /// The kind of this session, derived from its payload.
    pub fn kind(&self) -> SessionKind {
        self.details.kind()
    }

    /// Merge non-status fields from `changes` and stamp the audit fields.
    ///
    /// `created_at`, `teacher_id`, and `status` are never touched here.
    pub fn apply_changes(&mut self, changes: &SessionChanges, actor: &str) {
        if let Some(date) = changes.date {
            self.date = date;
        }
        if let Some(slot) = changes.time_slot {
            self.time_slot = slot;
        }
        if let Some(details) = &changes.details {
            self.details = details.clone();
        }
        if let Some(comment) = &changes.comment {
            self.comment = Some(comment.clone());
        }
        self.updated_at = Timestamp::now();
        self.updated_by = Some(actor.to_string());
    }

    /// Move the status along a graph edge, appending to the audit trail.
    ///
    /// Fails if the edge does not exist in the status graph. Role
    /// legality is checked upstream; this is the last line of defense
    /// against writes that bypass the gate.
    pub fn transition(
        &mut self,
        to: SessionStatus,
        actor: &str,
        comment: Option<String>,
    ) -> Result<(), StateError> {
        if !self.status.valid_transitions().contains(&to) {
            return Err(StateError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        let now = Timestamp::now();
        self.transitions.push(TransitionRecord {
            from_status: self.status,
            to_status: to,
            timestamp: now,
            actor: actor.to_string(),
            comment: comment.clone(),
        });
        self.status = to;
        self.comment = comment;
        self.updated_at = now;
        self.updated_by = Some(actor.to_string());
        Ok(())
    }
}
