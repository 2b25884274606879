//! # Engine Error Taxonomy
//!
//! Every condition a caller can recover from is a typed variant, not a
//! panic and not a stringly error. Denials are business as usual here —
//! an expired window or an unauthorized transition is an expected,
//! frequent outcome and flows back to the caller as data.

use thiserror::Error;
use uuid::Uuid;

use hse_state::{FieldError, StateError};

use crate::gate::DenyReason;

/// Errors produced by the lifecycle engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The referenced record does not exist (or is not visible to the
    /// caller).
    #[error("{what} not found: {id}")]
    NotFound {
        /// Record kind (`"session"`, `"user"`, …).
        what: &'static str,
        /// The identifier that missed.
        id: Uuid,
    },

    /// The authorization gate denied the mutation.
    #[error("forbidden: {0}")]
    Forbidden(#[from] DenyReason),

    /// The submitted payload is malformed, field by field.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The status graph has no such edge. After a matrix pass this is
    /// unreachable (the matrix is a subset of the graph); it guards
    /// writes that bypass the gate.
    #[error(transparent)]
    State(#[from] StateError),

    /// The record changed underneath an in-flight mutation in a way the
    /// engine could not re-evaluate. The in-memory stores decide and
    /// write under one lock and cannot produce this; a database-backed
    /// store may.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl EngineError {
    /// Shorthand for a missing session.
    pub fn session_not_found(id: Uuid) -> Self {
        EngineError::NotFound {
            what: "session",
            id,
        }
    }

    /// Shorthand for a missing user.
    pub fn user_not_found(id: Uuid) -> Self {
        EngineError::NotFound { what: "user", id }
    }
}
