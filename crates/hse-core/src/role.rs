//! # Privilege Roles
//!
//! The four account roles of HSE Declare. Exactly one role per user,
//! assigned at account creation and changed only by an explicit admin
//! action.
//!
//! Roles deliberately do **not** form a privilege ladder. PRINCIPAL can
//! validate a session but cannot mark it paid; SECRETARY can mark it paid
//! but cannot validate; ADMIN can touch any session's fields but can never
//! move its status. Authorization therefore always consults the explicit
//! transition table for the concrete role, never an ordering between
//! roles.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Account role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Declares sessions and edits them while self-service is open.
    Teacher,
    /// First reviewer; routes declarations and executes payment.
    Secretary,
    /// Final academic authority; the only role that can validate.
    Principal,
    /// Operational administrator; outside the approval chain.
    Admin,
}

/// All roles, in declaration order. Used to enumerate the authorization
/// matrix exhaustively.
pub const ROLE_COUNT: usize = 4;

impl Role {
    /// All roles, for exhaustive iteration.
    pub const ALL: [Role; ROLE_COUNT] = [Role::Teacher, Role::Secretary, Role::Principal, Role::Admin];

    /// Canonical wire name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "TEACHER",
            Role::Secretary => "SECRETARY",
            Role::Principal => "PRINCIPAL",
            Role::Admin => "ADMIN",
        }
    }

    /// Whether this role is school staff with cross-teacher visibility
    /// (secretary, principal, admin). Teachers see only their own records.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Secretary | Role::Principal | Role::Admin)
    }

    /// Whether this role sits in the approval chain (secretary, principal).
    ///
    /// ADMIN is excluded on purpose: operational administration and
    /// academic authority are separated, so an admin account can never
    /// advance a declaration toward payment.
    pub fn is_reviewer(&self) -> bool {
        matches!(self, Role::Secretary | Role::Principal)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = CoreError;

    /// Case-insensitive parse, used for bearer-token role segments and
    /// CLI arguments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TEACHER" => Ok(Role::Teacher),
            "SECRETARY" => Ok(Role::Secretary),
            "PRINCIPAL" => Ok(Role::Principal),
            "ADMIN" => Ok(Role::Admin),
            other => Err(CoreError::InvalidRole(other.to_string())),
        }
    }
}
