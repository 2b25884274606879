//! # hse-core — Foundational Types for HSE Declare
//!
//! This crate is the bedrock of HSE Declare, the extra-duty declaration
//! system for teaching staff. It defines the primitives every other crate
//! builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `UserId`, `SessionId`,
//!    `AttachmentId`, `NotificationId` — no bare UUIDs cross a function
//!    boundary, so an attachment id can never be looked up as a session.
//!
//! 2. **One `Role` enum, no privilege ordering.** The four roles do not form
//!    a ladder (the secretary can do things the principal cannot); every
//!    authorization check names the concrete role.
//!
//! 3. **UTC-only timestamps.** `Timestamp` truncates to seconds and rejects
//!    non-Z offsets at the strict parse boundary; the edit window and the
//!    retention clock both derive from stored creation instants.
//!
//! 4. **A closed slot grid.** `TimeSlot` makes the eight teaching hours of a
//!    school day a closed enum — a declaration cannot name a ninth hour.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hse-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod error;
pub mod identity;
pub mod role;
pub mod schedule;
pub mod temporal;
pub mod user;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use identity::{AttachmentId, NotificationId, SessionId, UserId};
pub use role::{Role, ROLE_COUNT};
pub use schedule::{TimeSlot, TIME_SLOT_COUNT};
pub use temporal::Timestamp;
pub use user::User;
