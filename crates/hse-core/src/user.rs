//! # User Accounts
//!
//! The `User` record: identity, display name, and the single role that
//! drives every authorization decision. Sessions reference their owner
//! through `teacher_id`; ownership is `session.teacher_id == user.id`.

use serde::{Deserialize, Serialize};

use crate::identity::UserId;
use crate::role::Role;
use crate::temporal::Timestamp;

/// A user account.
///
/// `password_hash` is opaque to this system — hashing happens upstream
/// and the value is never compared, rendered, or exported here. It exists
/// so that the erasure cascade and the export projection have a concrete
/// credential field to drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Login name, unique per school.
    pub username: String,
    /// Name shown in audit trails (`updated_by`) and notifications.
    pub display_name: String,
    /// The single role of this account.
    pub role: Role,
    /// Opaque credential material; never exported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Account creation instant.
    pub created_at: Timestamp,
}

impl User {
    /// Create a user with a fresh identifier.
    pub fn new(username: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            display_name: display_name.into(),
            role,
            password_hash: None,
            created_at: Timestamp::now(),
        }
    }
}
