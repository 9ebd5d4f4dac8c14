//! Seat ledger service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use libhub_database::store::{ActivityLogStore, UserStore};
use libhub_entity::activity::{ActivityLog, ActivityStatus, SeatPool, Section, SectionLabel};
use libhub_entity::user::User;

use super::policy::SeatPolicy;
use crate::error::LedgerError;

/// Seats in use out of seats available, for one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolOccupancy {
    pub total: i64,
    pub occupied: i64,
}

/// Occupancy of every seat pool for the current local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatAvailability {
    pub central: PoolOccupancy,
    pub reference: PoolOccupancy,
    pub reading: PoolOccupancy,
    pub elibrary: PoolOccupancy,
}

/// Tracks which students occupy which sections.
///
/// Capacity checks count today's active entries and then insert; two
/// concurrent check-ins for the last seat may both succeed.
#[derive(Debug, Clone)]
pub struct SeatLedger {
    /// Identity lookups.
    users: Arc<dyn UserStore>,
    /// Activity log persistence.
    activity: Arc<dyn ActivityLogStore>,
    /// Time and capacity rules.
    policy: SeatPolicy,
}

impl SeatLedger {
    /// Creates a new seat ledger.
    pub fn new(
        users: Arc<dyn UserStore>,
        activity: Arc<dyn ActivityLogStore>,
        policy: SeatPolicy,
    ) -> Self {
        Self {
            users,
            activity,
            policy,
        }
    }

    /// The policy in force.
    pub fn policy(&self) -> &SeatPolicy {
        &self.policy
    }

    /// Check a student into a section.
    pub async fn check_in(
        &self,
        roll_number: &str,
        raw_section: &str,
        now: DateTime<Utc>,
    ) -> Result<ActivityLog, LedgerError> {
        require_fields(&[roll_number, raw_section])?;
        let student = self.find_student(roll_number).await?;
        let roll = stored_roll(&student, roll_number);
        let today = self.policy.today(now);

        if let Some(active) = self.activity.find_active(&roll, today).await? {
            tracing::debug!(roll_number = %roll, section = %active.section, "Check-in rejected, already inside");
            return Err(LedgerError::AlreadyCheckedIn {
                section: active.section.to_string(),
            });
        }

        let section = parse_section(raw_section)?;
        let label = self.policy.resolve_label(section, now);
        self.ensure_seat(label.pool(), today, label).await?;

        let log = ActivityLog {
            id: Uuid::now_v7(),
            roll_number: roll,
            name: student.name.clone(),
            branch: student.branch.clone(),
            section: label,
            is_study_section: label.is_study(),
            date: today,
            time_in: self.policy.local_time(now),
            time_out: None,
            status: ActivityStatus::CheckedIn,
            duration: None,
            created_at: now,
        };
        self.activity.insert(&log).await?;

        tracing::info!(
            roll_number = %log.roll_number,
            section = %log.section,
            log_id = %log.id,
            "Student checked in"
        );

        Ok(log)
    }

    /// Check a student out of a section.
    ///
    /// Either reference label matches when checking out of reference.
    pub async fn check_out(
        &self,
        roll_number: &str,
        raw_section: &str,
        now: DateTime<Utc>,
    ) -> Result<ActivityLog, LedgerError> {
        require_fields(&[roll_number, raw_section])?;
        let student = self.find_student(roll_number).await?;
        let roll = stored_roll(&student, roll_number);
        let section = parse_section(raw_section)?;
        let today = self.policy.today(now);

        let mut log = self
            .activity
            .find_active_in(&roll, today, section.labels())
            .await?
            .ok_or(LedgerError::NoActiveCheckIn)?;

        let time_out = self.policy.local_time(now);
        log.time_out = Some(time_out);
        log.status = ActivityStatus::CheckedOut;
        log.duration = Some(format_duration(log.minutes_spent()));
        self.activity.update(&log).await?;

        tracing::info!(
            roll_number = %log.roll_number,
            section = %log.section,
            duration = log.duration.as_deref().unwrap_or_default(),
            "Student checked out"
        );

        Ok(log)
    }

    /// Move a student's active entry to another section.
    ///
    /// Labels are resolved without the time rule; the destination label is
    /// the study label only when `study_hint` asks for it. The destination
    /// count includes the entry being moved.
    pub async fn transfer(
        &self,
        roll_number: &str,
        from_section: &str,
        to_section: &str,
        now: DateTime<Utc>,
        study_hint: Option<bool>,
    ) -> Result<ActivityLog, LedgerError> {
        require_fields(&[roll_number, from_section, to_section])?;
        let student = self.find_student(roll_number).await?;
        let roll = stored_roll(&student, roll_number);
        let from = parse_section(from_section)?;
        let to = parse_section(to_section)?;
        let today = self.policy.today(now);

        let from_label = from.fixed_label(false);
        let mut log = self
            .activity
            .find_active_in(&roll, today, &[from_label])
            .await?
            .ok_or(LedgerError::NoActiveCheckIn)?;

        let to_label = to.fixed_label(study_hint.unwrap_or(false));
        self.ensure_seat(to_label.pool(), today, to_label).await?;

        log.section = to_label;
        log.is_study_section = to_label.is_study();
        self.activity.update(&log).await?;

        tracing::info!(
            roll_number = %log.roll_number,
            from = %from_label,
            to = %to_label,
            "Student transferred"
        );

        Ok(log)
    }

    /// Every entry of the current local day, newest first.
    pub async fn today_logs(&self, now: DateTime<Utc>) -> Result<Vec<ActivityLog>, LedgerError> {
        let logs = self.activity.list_by_date(self.policy.today(now)).await?;
        Ok(logs)
    }

    /// Occupancy of every pool for the current local day.
    pub async fn seat_availability(
        &self,
        now: DateTime<Utc>,
    ) -> Result<SeatAvailability, LedgerError> {
        let today = self.policy.today(now);
        Ok(SeatAvailability {
            central: self.occupancy(SeatPool::Central, today).await?,
            reference: self.occupancy(SeatPool::Reference, today).await?,
            reading: self.occupancy(SeatPool::Reading, today).await?,
            elibrary: self.occupancy(SeatPool::ELibrary, today).await?,
        })
    }

    async fn occupancy(
        &self,
        pool: SeatPool,
        today: chrono::NaiveDate,
    ) -> Result<PoolOccupancy, LedgerError> {
        Ok(PoolOccupancy {
            total: self.policy.capacity(pool),
            occupied: self.activity.count_active_in(today, pool.labels()).await?,
        })
    }

    async fn ensure_seat(
        &self,
        pool: SeatPool,
        today: chrono::NaiveDate,
        label: SectionLabel,
    ) -> Result<(), LedgerError> {
        let occupied = self.activity.count_active_in(today, pool.labels()).await?;
        if occupied >= self.policy.capacity(pool) {
            tracing::warn!(section = %label, occupied, "No seats available");
            return Err(LedgerError::SeatUnavailable {
                section: label.to_string(),
            });
        }
        Ok(())
    }

    async fn find_student(&self, roll_number: &str) -> Result<User, LedgerError> {
        match self.users.find_by_roll_number(roll_number.trim()).await? {
            Some(user) if user.is_student() => Ok(user),
            _ => Err(LedgerError::NotFound("Student not found".to_string())),
        }
    }
}

fn require_fields(fields: &[&str]) -> Result<(), LedgerError> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(LedgerError::Validation(
            "Roll number and section are required".to_string(),
        ));
    }
    Ok(())
}

fn parse_section(raw: &str) -> Result<Section, LedgerError> {
    Section::from_code(raw).ok_or_else(|| LedgerError::InvalidSection(raw.trim().to_string()))
}

/// Entries are keyed by the roll number stored on the user.
fn stored_roll(user: &User, requested: &str) -> String {
    user.roll_number
        .clone()
        .unwrap_or_else(|| requested.trim().to_string())
}

fn format_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}
