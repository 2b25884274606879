//! Errors returned by the privacy operations.

use thiserror::Error;
use uuid::Uuid;

use crate::guard::ErasureDenial;

/// What can go wrong when erasing or exporting a user's data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetentionError {
    /// The subject user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    /// The retention guard refused the erasure.
    #[error("erasure blocked: {0}")]
    Blocked(#[from] ErasureDenial),

    /// The caller is neither the subject nor an administrator.
    #[error("privacy operations are limited to the subject user or an administrator")]
    NotSubject,
}

#[cfg(test)]
mod tests {
    use super::*;
    use hse_core::Timestamp;

    #[test]
    fn test_blocked_message_carries_the_denial() {
        let err = RetentionError::from(ErasureDenial::RetentionPeriod {
            until: Timestamp::parse("2027-03-12T10:00:00Z").unwrap(),
        });
        assert_eq!(
            err.to_string(),
            "erasure blocked: statutory retention period runs until 2027-03-12T10:00:00Z"
        );
    }
}
