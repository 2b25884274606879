//! # hse-state — State Machines for HSE Declare
//!
//! The finite-state heart of the declaration workflow:
//!
//! - [`status`] — the session status graph (`PENDING_REVIEW` → … →
//!   `PAID`/`REJECTED`), with terminality and erasure-blocking semantics.
//! - [`matrix`] — the role-conditioned transition table: which role may
//!   move a session from which status to which. One table, consulted by
//!   one gate, unit-testable without HTTP.
//! - [`session`] — the `Session` entity: kind-specific payloads,
//!   changesets, field-by-field validation, and the append-only
//!   transition audit trail.
//! - [`attachment`] — file metadata with the secretariat's verification
//!   and archival flags.
//!
//! ## Key Design Principles
//!
//! 1. **The graph and the table are separate.** `valid_transitions()` is
//!    what the pipeline allows at all; `allowed_targets()` is what a role
//!    may do. The table is a strict subset of the graph, and a test pins
//!    that relationship.
//!
//! 2. **Nothing here authorizes.** Ownership, edit windows, and role
//!    checks live in the engine crate. Entities enforce only invariants
//!    that hold for every caller.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod attachment;
pub mod matrix;
pub mod session;
pub mod status;

// ─── Status graph re-exports ───
pub use status::{SessionStatus, StateError, STATUS_COUNT};

// ─── Matrix re-exports ───
pub use matrix::{allowed_targets, entries, role_may_set, MatrixEntry};

// ─── Session re-exports ───
pub use session::{
    FieldError, Session, SessionChanges, SessionDetails, SessionKind, TransitionRecord,
};

// ─── Attachment re-exports ───
pub use attachment::Attachment;
