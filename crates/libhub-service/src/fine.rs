//! Overdue fine calculation.

use chrono::{DateTime, Utc};

use libhub_core::config::LibraryConfig;

/// Grace period and daily rate applied to overdue loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinePolicy {
    /// Days past the due date before fines accrue.
    pub grace_days: i64,
    /// Fine per day past the grace period.
    pub per_day: i64,
}

impl FinePolicy {
    /// Policy from the library configuration.
    pub fn from_config(config: &LibraryConfig) -> Self {
        Self {
            grace_days: config.fine_grace_days,
            per_day: config.fine_per_day,
        }
    }
}

impl Default for FinePolicy {
    fn default() -> Self {
        Self {
            grace_days: 7,
            per_day: 1,
        }
    }
}

/// Fine owed at `now` for a loan due at `due_date`.
///
/// Whole elapsed days past the due date, minus the grace period, times the
/// daily rate. Never negative.
pub fn calculate_fine(due_date: DateTime<Utc>, now: DateTime<Utc>, policy: &FinePolicy) -> i64 {
    let days_overdue = (now - due_date).num_days();
    let chargeable = days_overdue - policy.grace_days;
    if chargeable <= 0 {
        return 0;
    }
    chargeable.saturating_mul(policy.per_day).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_no_fine_inside_grace_window() {
        let policy = FinePolicy::default();
        assert_eq!(calculate_fine(due(), due() - Duration::days(3), &policy), 0);
        assert_eq!(calculate_fine(due(), due(), &policy), 0);
        assert_eq!(calculate_fine(due(), due() + Duration::days(7), &policy), 0);
    }

    #[test]
    fn test_fine_after_grace_window() {
        let policy = FinePolicy::default();
        assert_eq!(calculate_fine(due(), due() + Duration::days(8), &policy), 1);
        assert_eq!(calculate_fine(due(), due() + Duration::days(10), &policy), 3);
    }

    #[test]
    fn test_partial_days_are_floored() {
        let policy = FinePolicy::default();
        let now = due() + Duration::days(9) + Duration::hours(23);
        assert_eq!(calculate_fine(due(), now, &policy), 2);
    }

    #[test]
    fn test_rate_is_applied() {
        let policy = FinePolicy {
            grace_days: 0,
            per_day: 5,
        };
        assert_eq!(calculate_fine(due(), due() + Duration::days(4), &policy), 20);
    }

    #[test]
    fn test_monotonic_in_days_overdue() {
        let policy = FinePolicy::default();
        let mut previous = 0;
        for day in 0..60 {
            let fine = calculate_fine(due(), due() + Duration::days(day), &policy);
            assert!(fine >= previous);
            previous = fine;
        }
    }
}
