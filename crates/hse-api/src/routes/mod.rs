//! # API Route Modules
//!
//! Route modules for the HSE Declare HTTP surface:
//!
//! - `sessions` — declaration lifecycle: create, list, fetch, changeset
//!   updates (fields and/or status in one decision), delete, the
//!   edit-window report, and the transition audit trail.
//! - `attachments` — supporting-document metadata: registration against
//!   a session, listing, and the secretariat's review flags.
//! - `settings` — the admin-writable configuration table
//!   (`SESSION_EDIT_WINDOW`, `DATA_RETENTION_YEARS`).
//! - `notifications` — a teacher's in-app inbox: listing and mark-read.
//! - `users` — account management (admin-created, staff-listed).
//! - `teachers` — the per-teacher declaration profile (school year,
//!   weekly quota).
//! - `privacy` — RGPD surface: right-to-erasure and the portability
//!   export.

pub mod attachments;
pub mod notifications;
pub mod privacy;
pub mod sessions;
pub mod settings;
pub mod teachers;
pub mod users;
