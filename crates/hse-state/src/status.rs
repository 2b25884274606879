//! # Session Status Graph
//!
//! The finite-state model of a declared session's approval pipeline.
//! A session is created in `PENDING_REVIEW` and moves through secretariat
//! review and principal validation toward payment.
//!
//! ## Status graph
//!
//! ```text
//! PENDING_REVIEW ──► PENDING_DOCUMENTS ──► PENDING_VALIDATION ──► VALIDATED ──► READY_FOR_PAYMENT ──► PAID
//!        │                    │                     │                  │                               ▲
//!        │                    │                     │                  └───────────────────────────────┘
//!        └────────────────────┴─────────────────────┴──► REJECTED
//! ```
//!
//! Shortcut edges not drawn: `PENDING_REVIEW` may go straight to
//! `PENDING_VALIDATION`, and both `PENDING_REVIEW` and `PENDING_DOCUMENTS`
//! may jump directly to `VALIDATED` (principal fast-path).
//!
//! Terminal statuses: `PAID`, `REJECTED`.
//!
//! ## Design Choice: Validated Enum over Typestate
//!
//! The graph is encoded as a plain enum with a `valid_transitions()` table
//! rather than typestate structs. Sessions are loaded from a store at
//! runtime with a status known only then, and the same edge can be legal
//! for one caller and illegal for another — role legality is a second,
//! separate table ([`crate::matrix`]) layered on top of this graph. A
//! compile-time encoding of the graph would still need the runtime role
//! check, so the enum keeps one mechanism instead of two.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Approval status of a declared session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Freshly declared; awaiting secretariat review. Initial status.
    PendingReview,
    /// The secretariat asked for supporting documents.
    PendingDocuments,
    /// Forwarded to the principal for validation.
    PendingValidation,
    /// Approved by the principal; awaiting payment execution.
    Validated,
    /// Refused. Terminal.
    Rejected,
    /// Queued in a payment batch. Set by payment tooling, not by any role
    /// through the declaration surface.
    ReadyForPayment,
    /// Payment executed. Terminal.
    Paid,
}

/// Number of statuses in the graph.
pub const STATUS_COUNT: usize = 7;

impl SessionStatus {
    /// All statuses, for exhaustive iteration over the matrix.
    pub const ALL: [SessionStatus; STATUS_COUNT] = [
        SessionStatus::PendingReview,
        SessionStatus::PendingDocuments,
        SessionStatus::PendingValidation,
        SessionStatus::Validated,
        SessionStatus::Rejected,
        SessionStatus::ReadyForPayment,
        SessionStatus::Paid,
    ];

    /// Canonical wire name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::PendingReview => "PENDING_REVIEW",
            SessionStatus::PendingDocuments => "PENDING_DOCUMENTS",
            SessionStatus::PendingValidation => "PENDING_VALIDATION",
            SessionStatus::Validated => "VALIDATED",
            SessionStatus::Rejected => "REJECTED",
            SessionStatus::ReadyForPayment => "READY_FOR_PAYMENT",
            SessionStatus::Paid => "PAID",
        }
    }

    /// Statuses reachable from this one, ignoring roles.
    ///
    /// This is the raw graph. Whether a given actor may take an edge is a
    /// separate question answered by [`crate::matrix::allowed_targets`].
    pub fn valid_transitions(&self) -> &'static [SessionStatus] {
        match self {
            SessionStatus::PendingReview => &[
                SessionStatus::PendingDocuments,
                SessionStatus::PendingValidation,
                SessionStatus::Validated,
                SessionStatus::Rejected,
            ],
            SessionStatus::PendingDocuments => &[
                SessionStatus::PendingValidation,
                SessionStatus::Validated,
                SessionStatus::Rejected,
            ],
            SessionStatus::PendingValidation => {
                &[SessionStatus::Validated, SessionStatus::Rejected]
            }
            SessionStatus::Validated => {
                &[SessionStatus::ReadyForPayment, SessionStatus::Paid]
            }
            SessionStatus::ReadyForPayment => &[SessionStatus::Paid],
            SessionStatus::Rejected => &[],
            SessionStatus::Paid => &[],
        }
    }

    /// Whether this status admits no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Paid | SessionStatus::Rejected)
    }

    /// Whether a session in this status still owes the teacher an answer
    /// or the school a payment. Such sessions block erasure of the
    /// teacher's records.
    ///
    /// `VALIDATED` counts as in-flight on purpose: it has been approved
    /// but not paid, and erasing it would break the payment audit chain.
    /// `PENDING_DOCUMENTS` does not block — the ball is in the teacher's
    /// court and abandoning the request is their right.
    pub fn blocks_erasure(&self) -> bool {
        matches!(
            self,
            SessionStatus::PendingReview
                | SessionStatus::PendingValidation
                | SessionStatus::Validated
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from graph-level status manipulation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The requested edge does not exist in the status graph.
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status name.
        from: String,
        /// Attempted target status name.
        to: String,
    },
}
