//! # Right-to-Portability Export
//!
//! The read-only projection handed to a teacher who asks for their
//! data: everything the system holds about them, in one JSON document,
//! with the legal basis and the retention policy spelled out. The
//! password hash never leaves the user store.

use hse_core::{Role, Timestamp, User, UserId};
use hse_notify::Notification;
use hse_state::{Attachment, Session};
use serde::{Deserialize, Serialize};

use crate::setup::TeacherSetup;

/// Legal basis statement attached to every export.
pub const LEGAL_BASIS: &str = "Article 6(1)(b) RGPD — exécution du contrat de travail \
     (gestion des heures supplémentaires effectives)";

/// The exported view of a user account. Deliberately narrower than
/// [`User`]: no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedUser {
    /// Account identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Display name.
    pub display_name: String,
    /// Assigned role.
    pub role: Role,
    /// Account creation instant.
    pub created_at: Timestamp,
}

impl From<User> for ExportedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// The complete export document for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    /// When the export was assembled.
    pub exported_at: Timestamp,
    /// Why the data is processed at all.
    pub legal_basis: String,
    /// How long it is kept, phrased with the current configuration.
    pub retention_policy: String,
    /// The account.
    pub user: ExportedUser,
    /// The declaration profile, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_setup: Option<TeacherSetup>,
    /// All sessions, oldest first, transition history included.
    pub sessions: Vec<Session>,
    /// Metadata of every file attached to those sessions.
    pub attachments: Vec<Attachment>,
    /// In-app notifications addressed to the user.
    pub notifications: Vec<Notification>,
}

/// Assemble an export from already-gathered records.
pub fn assemble(
    user: User,
    teacher_setup: Option<TeacherSetup>,
    mut sessions: Vec<Session>,
    mut attachments: Vec<Attachment>,
    mut notifications: Vec<Notification>,
    retention_years: u32,
) -> ExportBundle {
    sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    attachments.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at));
    notifications.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    ExportBundle {
        exported_at: Timestamp::now(),
        legal_basis: LEGAL_BASIS.to_string(),
        retention_policy: format!(
            "Conservation {retention_years} ans à compter de la première déclaration, \
             puis suppression sur demande."
        ),
        user: user.into(),
        teacher_setup,
        sessions,
        attachments,
        notifications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hse_core::TimeSlot;
    use hse_state::SessionDetails;

    #[test]
    fn test_export_never_carries_credentials() {
        let mut user = User::new("mdupont", "M. Dupont", Role::Teacher);
        user.password_hash = Some("$argon2id$v=19$...".to_string());

        let bundle = assemble(user, None, Vec::new(), Vec::new(), Vec::new(), 5);
        let json = serde_json::to_string(&bundle).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_sessions_exported_oldest_first() {
        let user = User::new("mdupont", "M. Dupont", Role::Teacher);
        let mut old = Session::declare(
            user.id,
            NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            TimeSlot::M1,
            SessionDetails::ExtraHours,
        );
        old.created_at = Timestamp::parse("2024-09-02T08:00:00Z").unwrap();
        let mut recent = Session::declare(
            user.id,
            NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
            TimeSlot::M2,
            SessionDetails::ExtraHours,
        );
        recent.created_at = Timestamp::parse("2026-03-12T08:00:00Z").unwrap();

        let bundle = assemble(
            user,
            None,
            vec![recent.clone(), old.clone()],
            Vec::new(),
            Vec::new(),
            5,
        );
        assert_eq!(bundle.sessions[0].id, old.id);
        assert_eq!(bundle.sessions[1].id, recent.id);
    }

    #[test]
    fn test_retention_policy_reflects_configuration() {
        let user = User::new("mdupont", "M. Dupont", Role::Teacher);
        let bundle = assemble(user, None, Vec::new(), Vec::new(), Vec::new(), 3);
        assert!(bundle.retention_policy.contains("3 ans"));
        assert_eq!(bundle.legal_basis, LEGAL_BASIS);
    }
}
