//! # Erasure Verdict
//!
//! Whether a teacher's full data set may be erased right now. Two things
//! can say no:
//!
//! 1. **In-flight sessions.** A session still owing a decision or a
//!    payment (`PENDING_REVIEW`, `PENDING_VALIDATION`, `VALIDATED`)
//!    pins the records it depends on. `PENDING_DOCUMENTS` does not
//!    block: the ball is in the teacher's court, and a teacher who asks
//!    for erasure instead is abandoning the request.
//! 2. **The statutory retention clock.** Payroll records must be kept
//!    for a number of years after the first declaration; the clock runs
//!    from the oldest session's creation instant.
//!
//! A user with no sessions at all has nothing retained and may always be
//! erased. The verdict itself never mutates anything.

use hse_core::{Timestamp, UserId};
use hse_engine::{SessionStore, SettingsStore};
use hse_state::{Session, SessionStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an erasure request was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErasureDenial {
    /// Sessions are still moving through the approval pipeline.
    #[error("{count} session(s) still in the approval pipeline ({})", join_statuses(.statuses))]
    PendingSessions {
        /// How many sessions block.
        count: usize,
        /// The distinct blocking statuses, in pipeline order.
        statuses: Vec<SessionStatus>,
    },
    /// The statutory retention period has not elapsed.
    #[error("statutory retention period runs until {until}")]
    RetentionPeriod {
        /// First instant at which erasure becomes possible.
        until: Timestamp,
    },
}

fn join_statuses(statuses: &[SessionStatus]) -> String {
    statuses
        .iter()
        .map(SessionStatus::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The guard's answer to "may this user be erased?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErasureVerdict {
    /// Nothing stands in the way.
    Allowed,
    /// Refused, with the reason.
    Denied(ErasureDenial),
}

impl ErasureVerdict {
    /// Whether the verdict permits erasure.
    pub fn is_allowed(&self) -> bool {
        matches!(self, ErasureVerdict::Allowed)
    }
}

/// Pure verdict over an already-gathered session set.
///
/// `retention_years` counts from the oldest `created_at`; the period is
/// over once `now` reaches the computed end, inclusive.
pub fn verdict(sessions: &[Session], now: Timestamp, retention_years: u32) -> ErasureVerdict {
    let blocking: Vec<&Session> = sessions.iter().filter(|s| s.status.blocks_erasure()).collect();
    if !blocking.is_empty() {
        let statuses: Vec<SessionStatus> = [
            SessionStatus::PendingReview,
            SessionStatus::PendingValidation,
            SessionStatus::Validated,
        ]
        .into_iter()
        .filter(|status| blocking.iter().any(|s| s.status == *status))
        .collect();
        return ErasureVerdict::Denied(ErasureDenial::PendingSessions {
            count: blocking.len(),
            statuses,
        });
    }

    let Some(earliest) = sessions.iter().map(|s| s.created_at).min() else {
        return ErasureVerdict::Allowed;
    };
    let until = earliest.plus_years(retention_years);
    if now < until {
        ErasureVerdict::Denied(ErasureDenial::RetentionPeriod { until })
    } else {
        ErasureVerdict::Allowed
    }
}

/// The stateful face of the verdict: gathers the user's sessions and
/// reads the retention period fresh from settings on every call.
#[derive(Clone)]
pub struct DataRetentionGuard {
    sessions: SessionStore,
    settings: SettingsStore,
}

impl DataRetentionGuard {
    /// Build a guard over the given stores.
    pub fn new(sessions: SessionStore, settings: SettingsStore) -> Self {
        Self { sessions, settings }
    }

    /// May this user's data set be erased right now?
    pub fn can_erase(&self, user_id: UserId) -> ErasureVerdict {
        let sessions: Vec<Session> = self
            .sessions
            .list()
            .into_iter()
            .filter(|s| s.teacher_id == user_id)
            .collect();
        let years = self.settings.retention_years();
        verdict(&sessions, Timestamp::now(), years)
    }
}

impl std::fmt::Debug for DataRetentionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataRetentionGuard")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}
