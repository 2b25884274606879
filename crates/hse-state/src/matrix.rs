//! # Role-Conditioned Transition Matrix
//!
//! One explicit table answering: given a session's current status, which
//! target statuses may an actor of a given role set? Every status-change
//! authorization in the system flows through this module — route handlers
//! never carry their own role conditionals.
//!
//! The table is deliberately narrower than the raw status graph
//! ([`SessionStatus::valid_transitions`]): an edge can exist in the graph
//! while no role may take it through the declaration surface
//! (`READY_FOR_PAYMENT` is reserved for payment-batch tooling).
//!
//! ## The table
//!
//! | From | SECRETARY | PRINCIPAL |
//! |---|---|---|
//! | `PENDING_REVIEW` | `PENDING_VALIDATION`, `PENDING_DOCUMENTS`, `REJECTED` | `PENDING_VALIDATION`, `PENDING_DOCUMENTS`, `VALIDATED`, `REJECTED` |
//! | `PENDING_DOCUMENTS` | `PENDING_VALIDATION`, `REJECTED` | `PENDING_VALIDATION`, `VALIDATED`, `REJECTED` |
//! | `PENDING_VALIDATION` | — | `VALIDATED`, `REJECTED` |
//! | `VALIDATED` | `PAID` | — |
//!
//! TEACHER and ADMIN have empty rows everywhere: teachers declare and
//! correct, they never move statuses; admins administer accounts and
//! settings, and their exclusion from the approval chain is a design
//! decision, not an omission. Note the asymmetry at `VALIDATED`: payment
//! execution is secretarial duty, so the principal — who alone can
//! validate — cannot mark a session paid.

use hse_core::Role;
use serde::{Deserialize, Serialize};

use crate::status::SessionStatus;

/// Target statuses an actor of `role` may set on a session currently in
/// `status`. Empty slice means the role may not change the status at all
/// from there.
pub fn allowed_targets(status: SessionStatus, role: Role) -> &'static [SessionStatus] {
    match (status, role) {
        (SessionStatus::PendingReview, Role::Secretary) => &[
            SessionStatus::PendingValidation,
            SessionStatus::PendingDocuments,
            SessionStatus::Rejected,
        ],
        (SessionStatus::PendingDocuments, Role::Secretary) => {
            &[SessionStatus::PendingValidation, SessionStatus::Rejected]
        }
        (SessionStatus::Validated, Role::Secretary) => &[SessionStatus::Paid],

        (SessionStatus::PendingReview, Role::Principal) => &[
            SessionStatus::PendingValidation,
            SessionStatus::PendingDocuments,
            SessionStatus::Validated,
            SessionStatus::Rejected,
        ],
        (SessionStatus::PendingDocuments, Role::Principal) => &[
            SessionStatus::PendingValidation,
            SessionStatus::Validated,
            SessionStatus::Rejected,
        ],
        (SessionStatus::PendingValidation, Role::Principal) => {
            &[SessionStatus::Validated, SessionStatus::Rejected]
        }

        // Teachers and admins never change statuses; reviewers have no
        // authority over statuses not listed above.
        _ => &[],
    }
}

/// Whether `role` may move a session from `status` to `target`.
pub fn role_may_set(status: SessionStatus, role: Role, target: SessionStatus) -> bool {
    allowed_targets(status, role).contains(&target)
}

/// One row of the matrix, in exportable form. Produced by [`entries`] for
/// the CLI `matrix` command and for documentation tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixEntry {
    /// Acting role.
    pub role: Role,
    /// Current status.
    pub from: SessionStatus,
    /// Statuses the role may set from there.
    pub targets: Vec<SessionStatus>,
}

/// Every non-empty row of the matrix, role-major, statuses in
/// declaration order.
pub fn entries() -> Vec<MatrixEntry> {
    let mut rows = Vec::new();
    for role in Role::ALL {
        for from in SessionStatus::ALL {
            let targets = allowed_targets(from, role);
            if !targets.is_empty() {
                rows.push(MatrixEntry {
                    role,
                    from,
                    targets: targets.to_vec(),
                });
            }
        }
    }
    rows
}
