//! # hse-engine — Session Lifecycle Engine for HSE Declare
//!
//! Everything that decides and mutates, in one crate:
//!
//! - [`store`] — thread-safe in-memory stores with atomic
//!   check-then-write primitives.
//! - [`settings`] — runtime configuration (edit window, retention
//!   period), lazily materialized and always read fresh.
//! - [`window`] — the pure edit-window computation.
//! - [`gate`] — the authorization gate: ownership, the role/status
//!   transition table, and window enforcement, in that order.
//! - [`lifecycle`] — the engine that ties it together and emits
//!   [`StatusChanged`] events to registered listeners.
//! - [`error`] — the engine's error taxonomy.
//!
//! ## Key Design Principles
//!
//! 1. **Decide and write under one lock.** The gate's verdict and the
//!    mutation it permits happen inside a single `try_update` closure.
//!    Concurrent writers serialize; the loser is re-judged against the
//!    winner's state instead of overwriting it.
//!
//! 2. **Policy reads are fresh.** The edit window and retention period
//!    are read from [`settings::SettingsStore`] at every decision point,
//!    never cached in the engine. An admin change takes effect on the
//!    very next evaluation.
//!
//! 3. **Events after the lock.** Listeners observe committed changes
//!    only, and can neither veto nor deadlock a mutation.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and (where they cross a
//!   boundary) implement `Serialize`/`Deserialize`.

pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod settings;
pub mod store;
pub mod window;

// ─── Store re-exports ───
pub use store::{AttachmentStore, SessionStore, Store, UserStore};

// ─── Settings re-exports ───
pub use settings::{
    SettingsStore, SystemSetting, DATA_RETENTION_YEARS, DEFAULT_EDIT_WINDOW_MINUTES,
    DEFAULT_RETENTION_YEARS, KNOWN_KEYS, SESSION_EDIT_WINDOW,
};

// ─── Window re-exports ───
pub use window::{edit_window, EditWindow};

// ─── Gate re-exports ───
pub use gate::{authorize, DenyReason, SessionMutation};

// ─── Engine re-exports ───
pub use error::EngineError;
pub use lifecycle::{
    EditStatusReport, LifecycleEngine, NewSession, StatusChanged, StatusChangedListener,
};
