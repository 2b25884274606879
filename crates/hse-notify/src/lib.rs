//! # hse-notify — Status-Change Notifications for HSE Declare
//!
//! Two small pieces, split on purpose:
//!
//! - [`render`] — the pure mapping from a new status (plus an optional
//!   reviewer comment) to a French `{title, message}` pair. No I/O.
//! - [`recorder`] — the engine listener that files the rendered text as
//!   an in-app [`Notification`] for the session's owning teacher, with
//!   read tracking.
//!
//! Delivery transport (e-mail, push) is somebody else's problem: a
//! transport would be just another listener on the engine, consuming
//! the same events this crate does.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod recorder;
pub mod render;

// ─── Rendering re-exports ───
pub use render::{render, NotificationContent};

// ─── Recorder re-exports ───
pub use recorder::{Notification, NotificationRecorder, NotificationStore};
