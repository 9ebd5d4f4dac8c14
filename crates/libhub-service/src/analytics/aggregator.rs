//! Usage summaries computed from checked-out activity entries.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, Timelike, Utc};
use serde::Serialize;

use libhub_core::config::LibraryConfig;
use libhub_database::store::{ActivityLogStore, UserStore};
use libhub_entity::activity::ActivityLog;

use crate::error::LedgerError;
use crate::time;

/// Visits and minutes spent in one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionUsage {
    pub visits: i64,
    pub minutes: i64,
}

/// How a student used the library over the trailing window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub roll_number: String,
    pub window_days: i64,
    pub total_visits: i64,
    pub total_minutes: i64,
    pub average_minutes: f64,
    /// Keyed by section label.
    pub by_section: BTreeMap<String, SectionUsage>,
    /// Minutes per local date (`YYYY-MM-DD`).
    pub by_day: BTreeMap<String, i64>,
    /// Check-ins per local hour of day, 24 buckets.
    pub hourly: Vec<i64>,
    /// Busiest check-in hour as `HH:00–HH:00`.
    pub peak_hour: Option<String>,
}

/// Read-only aggregation over the activity log.
#[derive(Debug, Clone)]
pub struct AnalyticsAggregator {
    users: Arc<dyn UserStore>,
    activity: Arc<dyn ActivityLogStore>,
    timezone: FixedOffset,
    window_days: i64,
}

impl AnalyticsAggregator {
    /// Creates a new aggregator.
    pub fn new(
        users: Arc<dyn UserStore>,
        activity: Arc<dyn ActivityLogStore>,
        config: &LibraryConfig,
    ) -> Self {
        Self {
            users,
            activity,
            timezone: config.timezone(),
            window_days: config.analytics_window_days.max(1),
        }
    }

    /// Summary of the student's completed visits in the window ending today.
    pub async fn usage_summary(
        &self,
        roll_number: &str,
        now: DateTime<Utc>,
    ) -> Result<UsageSummary, LedgerError> {
        let student = self
            .users
            .find_by_roll_number(roll_number.trim())
            .await?
            .filter(|u| u.is_student())
            .ok_or_else(|| LedgerError::NotFound("Student not found".to_string()))?;
        let roll = student
            .roll_number
            .unwrap_or_else(|| roll_number.trim().to_string());

        let today = time::local_date(now, self.timezone);
        let since = today - Duration::days(self.window_days - 1);
        let logs = self.activity.list_checked_out_since(&roll, since).await?;

        tracing::debug!(roll_number = %roll, visits = logs.len(), %since, "Computing usage summary");

        Ok(summarize(roll, self.window_days, &logs))
    }
}

fn summarize(roll_number: String, window_days: i64, logs: &[ActivityLog]) -> UsageSummary {
    let mut by_section: BTreeMap<String, SectionUsage> = BTreeMap::new();
    let mut by_day: BTreeMap<String, i64> = BTreeMap::new();
    let mut hourly = vec![0_i64; 24];
    let mut total_minutes = 0;

    for log in logs {
        let minutes = log.minutes_spent();
        total_minutes += minutes;

        let usage = by_section.entry(log.section.to_string()).or_default();
        usage.visits += 1;
        usage.minutes += minutes;

        *by_day.entry(log.date.to_string()).or_default() += minutes;
        hourly[log.time_in.hour() as usize] += 1;
    }

    let total_visits = logs.len() as i64;
    let average_minutes = if total_visits == 0 {
        0.0
    } else {
        total_minutes as f64 / total_visits as f64
    };

    UsageSummary {
        roll_number,
        window_days,
        total_visits,
        total_minutes,
        average_minutes,
        by_section,
        by_day,
        peak_hour: peak_hour(&hourly),
        hourly,
    }
}

/// Earliest hour with the most check-ins.
fn peak_hour(hourly: &[i64]) -> Option<String> {
    let (hour, count) = hourly
        .iter()
        .enumerate()
        .fold((0, 0), |best, (h, &c)| if c > best.1 { (h, c) } else { best });
    (count > 0).then(|| format!("{:02}:00–{:02}:00", hour, (hour + 1) % 24))
}
