//! # Authorization Gate
//!
//! One function deciding every session mutation: ownership, then status
//! authority against the transition matrix, then the edit window. The
//! gate is deterministic and side-effect-free — it looks at an actor, a
//! session, and a requested mutation, and answers allow or deny with a
//! typed reason. It never touches a store.
//!
//! ## Check order
//!
//! 1. Existence — handled by the caller's lookup (`NotFound` upstream).
//! 2. Ownership — a TEACHER may only touch their own session.
//! 3. Status authority — a requested status different from the current
//!    one is checked against [`hse_state::matrix`]; the denial carries
//!    the attempted `from → to` pair.
//! 4. Edit window — TEACHER and ADMIN field edits and deletes consult
//!    the window policy; the denial carries elapsed and remaining
//!    minutes. A TEACHER answering a document request
//!    (`PENDING_DOCUMENTS`) is exempt from the window.
//!
//! A changeset carrying both a status change and field edits is a single
//! decision: one illegal part denies the whole mutation.

use hse_core::{Role, Timestamp, User};
use hse_state::{matrix, Session, SessionChanges, SessionStatus};
use thiserror::Error;

use crate::window::edit_window;

/// Why a mutation was denied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The session belongs to another teacher.
    #[error("session belongs to another teacher")]
    NotOwner,

    /// The actor's role has no authority for the requested transition.
    #[error("role {role} may not move a session from {from} to {to}")]
    RoleCannotChangeStatus {
        /// Acting role.
        role: Role,
        /// Current status.
        from: SessionStatus,
        /// Requested status.
        to: SessionStatus,
    },

    /// Self-service edits are closed for sessions in this status.
    #[error("a session in status {status} can no longer be edited by its owner")]
    StatusNotEditable {
        /// Current status.
        status: SessionStatus,
    },

    /// The edit window has elapsed.
    #[error(
        "edit window expired: {elapsed_minutes} minute(s) elapsed, \
         {remaining_minutes} remaining of a {window_minutes}-minute window"
    )]
    WindowExpired {
        /// Whole minutes since creation.
        elapsed_minutes: i64,
        /// Whole minutes left (zero once expired).
        remaining_minutes: i64,
        /// The configured window.
        window_minutes: i64,
    },

    /// The actor's role may not delete a session in this status.
    #[error("role {role} may not delete a session in status {status}")]
    DeleteNotAllowed {
        /// Acting role.
        role: Role,
        /// Current status.
        status: SessionStatus,
    },

    /// Attachment verification and archival flags are reviewer-only.
    #[error("role {role} may not set attachment review flags")]
    AttachmentReviewNotAllowed {
        /// Acting role.
        role: Role,
    },
}

/// The mutation being requested on a session.
#[derive(Debug, Clone, Copy)]
pub enum SessionMutation<'a> {
    /// Partial update with the given changeset.
    Update(&'a SessionChanges),
    /// Removal of the session.
    Delete,
}

/// Decide whether `actor` may perform `mutation` on `session`.
///
/// `window_minutes` must be read from settings by the caller at
/// evaluation time; `now` is the evaluation instant.
pub fn authorize(
    actor: &User,
    session: &Session,
    mutation: &SessionMutation<'_>,
    now: Timestamp,
    window_minutes: i64,
) -> Result<(), DenyReason> {
    // Ownership: teachers only ever touch their own declarations. Staff
    // and admin operate school-wide.
    if actor.role == Role::Teacher && session.teacher_id != actor.id {
        return Err(DenyReason::NotOwner);
    }

    match mutation {
        SessionMutation::Update(changes) => authorize_update(actor, session, changes, now, window_minutes),
        SessionMutation::Delete => authorize_delete(actor, session, now, window_minutes),
    }
}

fn authorize_update(
    actor: &User,
    session: &Session,
    changes: &SessionChanges,
    now: Timestamp,
    window_minutes: i64,
) -> Result<(), DenyReason> {
    // Status authority. Requesting the current status is not a
    // transition, so it falls through to the field-edit rules.
    if let Some(target) = changes.status_change(session.status) {
        if !matrix::role_may_set(session.status, actor.role, target) {
            return Err(DenyReason::RoleCannotChangeStatus {
                role: actor.role,
                from: session.status,
                to: target,
            });
        }
    }

    // Field edits. Reviewers may annotate at any stage; teachers and
    // admins are time-boxed.
    if changes.has_field_edits() {
        match actor.role {
            Role::Teacher => match session.status {
                SessionStatus::PendingReview => {
                    check_window(session, now, window_minutes)?;
                }
                // Responding to a document request must stay possible
                // however long the secretariat took to ask.
                SessionStatus::PendingDocuments => {}
                status => return Err(DenyReason::StatusNotEditable { status }),
            },
            Role::Admin => {
                check_window(session, now, window_minutes)?;
            }
            Role::Secretary | Role::Principal => {}
        }
    }

    Ok(())
}

fn authorize_delete(
    actor: &User,
    session: &Session,
    now: Timestamp,
    window_minutes: i64,
) -> Result<(), DenyReason> {
    match actor.role {
        // A teacher may withdraw a declaration that nobody has looked at
        // yet, within the same window that bounds their edits.
        Role::Teacher => {
            if session.status != SessionStatus::PendingReview {
                return Err(DenyReason::DeleteNotAllowed {
                    role: actor.role,
                    status: session.status,
                });
            }
            check_window(session, now, window_minutes)
        }
        // An admin may clean up anything not yet validated, inside the
        // window.
        Role::Admin => {
            if session.status == SessionStatus::Validated {
                return Err(DenyReason::DeleteNotAllowed {
                    role: actor.role,
                    status: session.status,
                });
            }
            check_window(session, now, window_minutes)
        }
        // Reviewers reject; they do not erase.
        Role::Secretary | Role::Principal => Err(DenyReason::DeleteNotAllowed {
            role: actor.role,
            status: session.status,
        }),
    }
}

fn check_window(session: &Session, now: Timestamp, window_minutes: i64) -> Result<(), DenyReason> {
    let report = edit_window(session.created_at, now, window_minutes);
    if report.allowed {
        Ok(())
    } else {
        Err(DenyReason::WindowExpired {
            elapsed_minutes: report.elapsed_minutes,
            remaining_minutes: report.remaining_minutes,
            window_minutes,
        })
    }
}
