//! Time and capacity rules of the seat ledger.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

use libhub_core::config::{LibraryConfig, SeatCapacityConfig};
use libhub_core::error::AppError;
use libhub_entity::activity::{SeatPool, Section, SectionLabel};

use crate::time;

/// Resolved seat policy.
#[derive(Debug, Clone)]
pub struct SeatPolicy {
    timezone: FixedOffset,
    study_cutoff: NaiveTime,
    capacities: SeatCapacityConfig,
}

impl SeatPolicy {
    /// Build the policy, rejecting an unparseable study cutoff.
    pub fn from_config(config: &LibraryConfig) -> Result<Self, AppError> {
        Ok(Self {
            timezone: config.timezone(),
            study_cutoff: time::parse_cutoff(&config.study_section_cutoff)?,
            capacities: config.seats.clone(),
        })
    }

    /// The library's UTC offset.
    pub fn timezone(&self) -> FixedOffset {
        self.timezone
    }

    /// Local calendar day of `now`.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        time::local_date(now, self.timezone)
    }

    /// Local wall-clock time of `now`.
    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveTime {
        time::local_time(now, self.timezone)
    }

    /// Label for a check-in into `section` at `now`.
    pub fn resolve_label(&self, section: Section, now: DateTime<Utc>) -> SectionLabel {
        section.resolve_label(self.local_time(now), self.study_cutoff)
    }

    /// Number of seats in `pool`.
    pub fn capacity(&self, pool: SeatPool) -> i64 {
        match pool {
            SeatPool::Central => self.capacities.central,
            SeatPool::Reference => self.capacities.reference,
            SeatPool::Reading => self.capacities.reading,
            SeatPool::ELibrary => self.capacities.elibrary,
        }
    }
}
