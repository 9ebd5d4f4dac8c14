//! Library policy configuration: seat capacities, borrowing limits, fines.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Policy knobs injected into the seat and borrow ledgers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Offset of library local time from UTC, in minutes.
    #[serde(default = "default_timezone_offset")]
    pub timezone_offset_minutes: i32,
    /// Local time (`HH:MM`) from which the reference section becomes the
    /// study section.
    #[serde(default = "default_study_cutoff")]
    pub study_section_cutoff: String,
    /// Seat pool capacities.
    #[serde(default)]
    pub seats: SeatCapacityConfig,
    /// Maximum number of non-returned loans per student.
    #[serde(default = "default_max_books")]
    pub max_books_per_student: i64,
    /// Days after the due date before fines accrue.
    #[serde(default = "default_grace_days")]
    pub fine_grace_days: i64,
    /// Fine charged per day past the grace period.
    #[serde(default = "default_fine_per_day")]
    pub fine_per_day: i64,
    /// Condition recorded when a borrow request omits it.
    #[serde(default = "default_condition")]
    pub default_condition: String,
    /// Payment method recorded when a payment request omits it.
    #[serde(default = "default_payment_method")]
    pub default_payment_method: String,
    /// Trailing window, in days, covered by usage analytics.
    #[serde(default = "default_analytics_window")]
    pub analytics_window_days: i64,
}

impl LibraryConfig {
    /// The library's fixed UTC offset. Out-of-range values fall back to UTC.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timezone_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            timezone_offset_minutes: default_timezone_offset(),
            study_section_cutoff: default_study_cutoff(),
            seats: SeatCapacityConfig::default(),
            max_books_per_student: default_max_books(),
            fine_grace_days: default_grace_days(),
            fine_per_day: default_fine_per_day(),
            default_condition: default_condition(),
            default_payment_method: default_payment_method(),
            analytics_window_days: default_analytics_window(),
        }
    }
}

/// Number of seats in each seat pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatCapacityConfig {
    /// Central Library.
    #[serde(default = "default_central")]
    pub central: i64,
    /// Reference and Reference - Study Section combined.
    #[serde(default = "default_reference")]
    pub reference: i64,
    /// Reading Room.
    #[serde(default = "default_reading")]
    pub reading: i64,
    /// E-Library.
    #[serde(default = "default_elibrary")]
    pub elibrary: i64,
}

impl Default for SeatCapacityConfig {
    fn default() -> Self {
        Self {
            central: default_central(),
            reference: default_reference(),
            reading: default_reading(),
            elibrary: default_elibrary(),
        }
    }
}

fn default_timezone_offset() -> i32 {
    330
}

fn default_study_cutoff() -> String {
    "16:30".to_string()
}

fn default_max_books() -> i64 {
    4
}

fn default_grace_days() -> i64 {
    7
}

fn default_fine_per_day() -> i64 {
    1
}

fn default_condition() -> String {
    "New".to_string()
}

fn default_payment_method() -> String {
    "cash".to_string()
}

fn default_analytics_window() -> i64 {
    30
}

fn default_central() -> i64 {
    450
}

fn default_reference() -> i64 {
    300
}

fn default_reading() -> i64 {
    400
}

fn default_elibrary() -> i64 {
    100
}
