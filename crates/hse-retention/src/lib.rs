//! # hse-retention — RGPD Subject Rights for HSE Declare
//!
//! Erasure and portability over the same stores the lifecycle engine
//! writes:
//!
//! - [`guard`] — the erasure verdict: in-flight sessions and the
//!   statutory retention clock, nothing else.
//! - [`service`] — the [`PrivacyService`] executing the verdict: the
//!   cascading erasure and the export assembly, each restricted to the
//!   subject user or an administrator.
//! - [`export`] — the portability bundle itself, credentials excluded
//!   by construction.
//! - [`setup`] — the per-teacher profile row the cascade must cover.
//!
//! ## Key Design Principles
//!
//! 1. **Verdict and action are separate.** [`guard::verdict`] is a pure
//!    function over a session set; the cascade runs only after an
//!    `Allowed`. Tests exercise the rules without touching a store.
//!
//! 2. **The retention period is configuration.** `DATA_RETENTION_YEARS`
//!    is read fresh on every verdict, like every other policy knob.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod error;
pub mod export;
pub mod guard;
pub mod service;
pub mod setup;

// ─── Guard re-exports ───
pub use guard::{verdict, DataRetentionGuard, ErasureDenial, ErasureVerdict};

// ─── Service re-exports ───
pub use error::RetentionError;
pub use service::{ErasureReport, PrivacyService};

// ─── Export re-exports ───
pub use export::{ExportBundle, ExportedUser, LEGAL_BASIS};

// ─── Setup re-exports ───
pub use setup::{TeacherSetup, TeacherSetupStore};
