//! # Edit-Window Policy
//!
//! Answers one question: given when a session was created and the
//! configured window, is self-service correction still open, and for how
//! much longer? Pure arithmetic over three inputs; the caller is
//! responsible for reading the window from [`crate::settings`] at
//! evaluation time so that configuration changes apply immediately.

use hse_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Result of one edit-window evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditWindow {
    /// Whether self-service edits are still allowed.
    pub allowed: bool,
    /// Whole minutes elapsed since creation (floored, never negative).
    pub elapsed_minutes: i64,
    /// Whole minutes left before the window closes (never negative).
    pub remaining_minutes: i64,
}

/// Evaluate the edit window for a session created at `created_at`.
///
/// `elapsed = floor((now - created_at) in minutes)`, clamped at zero;
/// `remaining = max(0, window - elapsed)`; the boundary is inclusive —
/// at exactly `window` minutes elapsed the edit is still allowed, one
/// minute later it is not (and `remaining` reports 0).
pub fn edit_window(created_at: Timestamp, now: Timestamp, window_minutes: i64) -> EditWindow {
    let elapsed_minutes = now.minutes_since(created_at);
    let remaining_minutes = (window_minutes - elapsed_minutes).max(0);
    EditWindow {
        allowed: elapsed_minutes <= window_minutes,
        elapsed_minutes,
        remaining_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn minute_pair(elapsed_minutes: i64) -> (Timestamp, Timestamp) {
        let created = Timestamp::parse("2026-02-03T09:00:00Z").unwrap();
        let now =
            Timestamp::from_utc(*created.as_datetime() + Duration::minutes(elapsed_minutes));
        (created, now)
    }

    #[test]
    fn test_fresh_session_has_full_window() {
        let (created, now) = minute_pair(0);
        let window = edit_window(created, now, 60);
        assert!(window.allowed);
        assert_eq!(window.elapsed_minutes, 0);
        assert_eq!(window.remaining_minutes, 60);
    }

    #[test]
    fn test_partial_minutes_floor() {
        let created = Timestamp::parse("2026-02-03T09:00:00Z").unwrap();
        let now = Timestamp::parse("2026-02-03T09:59:59Z").unwrap();
        let window = edit_window(created, now, 60);
        assert_eq!(window.elapsed_minutes, 59);
        assert_eq!(window.remaining_minutes, 1);
        assert!(window.allowed);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let (created, now) = minute_pair(60);
        let window = edit_window(created, now, 60);
        assert!(window.allowed);
        assert_eq!(window.remaining_minutes, 0);
    }

    #[test]
    fn test_one_minute_past_window_denied() {
        let (created, now) = minute_pair(61);
        let window = edit_window(created, now, 60);
        assert!(!window.allowed);
        assert_eq!(window.elapsed_minutes, 61);
        assert_eq!(window.remaining_minutes, 0);
    }

    #[test]
    fn test_clock_skew_counts_as_zero_elapsed() {
        let (now, created) = minute_pair(5); // creation "in the future"
        let window = edit_window(created, now, 60);
        assert!(window.allowed);
        assert_eq!(window.elapsed_minutes, 0);
        assert_eq!(window.remaining_minutes, 60);
    }

    #[test]
    fn test_zero_window_allows_only_first_minute() {
        let (created, now) = minute_pair(0);
        assert!(edit_window(created, now, 0).allowed);
        let (created, now) = minute_pair(1);
        assert!(!edit_window(created, now, 0).allowed);
    }

    #[test]
    fn test_lowered_window_applies_to_old_sessions() {
        // 45 minutes in: fine under a 60-minute window, expired under 30.
        let (created, now) = minute_pair(45);
        assert!(edit_window(created, now, 60).allowed);
        assert!(!edit_window(created, now, 30).allowed);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Once the window has closed it never reopens: for a fixed
            /// window, `allowed` is non-increasing in elapsed time.
            #[test]
            fn prop_allowed_monotonically_non_increasing(
                window in 0i64..10_000,
                earlier in 0i64..20_000,
                delta in 0i64..20_000,
            ) {
                let (created, now_earlier) = minute_pair(earlier);
                let (_, now_later) = minute_pair(earlier + delta);
                let first = edit_window(created, now_earlier, window);
                let second = edit_window(created, now_later, window);
                // allowed can only go true -> false over time, never back.
                prop_assert!(first.allowed || !second.allowed);
            }

            /// Remaining minutes never exceed the window and never go
            /// negative, and elapsed + remaining ≥ window while open.
            #[test]
            fn prop_remaining_bounded(
                window in 0i64..10_000,
                elapsed in 0i64..20_000,
            ) {
                let (created, now) = minute_pair(elapsed);
                let report = edit_window(created, now, window);
                prop_assert!(report.remaining_minutes >= 0);
                prop_assert!(report.remaining_minutes <= window);
                if report.allowed {
                    prop_assert_eq!(
                        report.elapsed_minutes + report.remaining_minutes,
                        window
                    );
                }
            }
        }
    }
}
