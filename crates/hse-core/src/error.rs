//! # Error Types
//!
//! Shared parse/construction errors for the foundational types. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Workflow-level errors (authorization denials,
//! validation reports) live with the engines that produce them.

use thiserror::Error;

/// Errors from constructing or parsing foundational types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Timestamp string rejected.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Unknown role name.
    #[error("unknown role: {0:?}")]
    InvalidRole(String),

    /// Unknown time-slot name.
    #[error("unknown time slot: {0:?}")]
    InvalidTimeSlot(String),
}
