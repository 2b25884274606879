//! # Teacher Setup
//!
//! The per-teacher profile row: which school year the teacher is
//! declaring for and how many paid extra hours per week their service
//! allows. One row per teacher, keyed by the user id.
//!
//! The row matters to this crate because erasure must remove it after
//! the sessions and before the user record.

use hse_core::{Timestamp, UserId};
use hse_engine::Store;
use hse_state::FieldError;
use serde::{Deserialize, Serialize};

/// Per-teacher declaration profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherSetup {
    /// The teacher this row belongs to.
    pub user_id: UserId,
    /// School year being declared for (e.g. `"2025-2026"`).
    pub school_year: String,
    /// Weekly quota of paid extra hours.
    pub weekly_quota_hours: u32,
    /// When the row was first created.
    pub created_at: Timestamp,
}

impl TeacherSetup {
    /// Build a fresh setup row.
    pub fn new(user_id: UserId, school_year: impl Into<String>, weekly_quota_hours: u32) -> Self {
        Self {
            user_id,
            school_year: school_year.into(),
            weekly_quota_hours,
            created_at: Timestamp::now(),
        }
    }

    /// Field-by-field validation. Empty result means valid.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.school_year.trim().is_empty() {
            errors.push(FieldError::new(
                "school_year",
                "school year must not be empty",
            ));
        }
        if self.school_year.len() > 16 {
            errors.push(FieldError::new(
                "school_year",
                "school year must not exceed 16 characters",
            ));
        }
        if self.weekly_quota_hours > 30 {
            errors.push(FieldError::new(
                "weekly_quota_hours",
                "weekly quota must not exceed 30 hours",
            ));
        }
        errors
    }
}

/// Shared store of setup rows, keyed by the teacher's user id.
pub type TeacherSetupStore = Store<TeacherSetup>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_setup_passes() {
        let setup = TeacherSetup::new(UserId::new(), "2025-2026", 4);
        assert!(setup.validate().is_empty());
    }

    #[test]
    fn test_empty_school_year_and_oversized_quota() {
        let setup = TeacherSetup::new(UserId::new(), "  ", 31);
        let errors = setup.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.field == "school_year"));
        assert!(errors.iter().any(|e| e.field == "weekly_quota_hours"));
    }
}
