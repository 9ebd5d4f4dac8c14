//! Activity log (seat ledger entry) model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::section::SectionLabel;

/// Whether the student is still in the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_status")]
pub enum ActivityStatus {
    #[serde(rename = "Checked In")]
    #[sqlx(rename = "Checked In")]
    CheckedIn,
    #[serde(rename = "Checked Out")]
    #[sqlx(rename = "Checked Out")]
    CheckedOut,
}

/// One visit of one student to one section on one local day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    /// Entry identifier.
    pub id: Uuid,
    /// Student roll number, as stored on the user.
    pub roll_number: String,
    /// Student name at check-in.
    pub name: String,
    /// Student branch at check-in.
    pub branch: Option<String>,
    /// Display label of the section.
    pub section: SectionLabel,
    /// Whether the label is the study variant.
    pub is_study_section: bool,
    /// Local calendar day of the visit.
    pub date: NaiveDate,
    /// Local check-in time.
    pub time_in: NaiveTime,
    /// Local check-out time.
    pub time_out: Option<NaiveTime>,
    /// Visit state.
    pub status: ActivityStatus,
    /// "Xh Ym", set at checkout.
    pub duration: Option<String>,
    /// Creation instant, used for newest-first ordering.
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    /// Checked in and not yet checked out.
    pub fn is_active(&self) -> bool {
        self.status == ActivityStatus::CheckedIn && self.time_out.is_none()
    }

    /// Minutes between check-in and check-out, zero when still active.
    pub fn minutes_spent(&self) -> i64 {
        match self.time_out {
            Some(out) => (out - self.time_in).num_minutes().max(0),
            None => 0,
        }
    }
}
