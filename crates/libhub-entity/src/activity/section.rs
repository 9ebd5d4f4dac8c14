//! Sections, their display labels and the seat pools they draw from.
//!
//! A request names a [`Section`] by code. The entry stores a
//! [`SectionLabel`]. Capacity is tracked per [`SeatPool`]. The only
//! time-dependent rule is that the reference section turns into the
//! study section from the configured cutoff onwards.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Section codes accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Central,
    Reference,
    Reading,
    ELibrary,
}

impl Section {
    /// Look up a code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "central" => Some(Self::Central),
            "reference" => Some(Self::Reference),
            "reading" => Some(Self::Reading),
            "elibrary" => Some(Self::ELibrary),
            _ => None,
        }
    }

    /// Return the section code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Central => "central",
            Self::Reference => "reference",
            Self::Reading => "reading",
            Self::ELibrary => "elibrary",
        }
    }

    /// The seat pool this section draws from.
    pub fn pool(&self) -> SeatPool {
        match self {
            Self::Central => SeatPool::Central,
            Self::Reference => SeatPool::Reference,
            Self::Reading => SeatPool::Reading,
            Self::ELibrary => SeatPool::ELibrary,
        }
    }

    /// Label for a check-in at `local_time`. Reference becomes the study
    /// section at or after `cutoff`.
    pub fn resolve_label(&self, local_time: NaiveTime, cutoff: NaiveTime) -> SectionLabel {
        self.fixed_label(local_time >= cutoff)
    }

    /// Label without the time rule; `study` only affects reference.
    pub fn fixed_label(&self, study: bool) -> SectionLabel {
        match self {
            Self::Central => SectionLabel::CentralLibrary,
            Self::Reference if study => SectionLabel::ReferenceStudy,
            Self::Reference => SectionLabel::Reference,
            Self::Reading => SectionLabel::ReadingRoom,
            Self::ELibrary => SectionLabel::ELibrary,
        }
    }

    /// Every label an entry in this section may carry.
    pub fn labels(&self) -> &'static [SectionLabel] {
        self.pool().labels()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Section {
    type Err = libhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| {
            libhub_core::AppError::validation(format!(
                "Invalid section: '{s}'. Expected one of: central, reference, reading, elibrary"
            ))
        })
    }
}

/// Display label stored on an activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "section_label")]
pub enum SectionLabel {
    #[serde(rename = "Central Library")]
    #[sqlx(rename = "Central Library")]
    CentralLibrary,
    #[serde(rename = "Reference")]
    #[sqlx(rename = "Reference")]
    Reference,
    #[serde(rename = "Reference - Study Section")]
    #[sqlx(rename = "Reference - Study Section")]
    ReferenceStudy,
    #[serde(rename = "Reading Room")]
    #[sqlx(rename = "Reading Room")]
    ReadingRoom,
    #[serde(rename = "E-Library")]
    #[sqlx(rename = "E-Library")]
    ELibrary,
}

impl SectionLabel {
    /// Return the display text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CentralLibrary => "Central Library",
            Self::Reference => "Reference",
            Self::ReferenceStudy => "Reference - Study Section",
            Self::ReadingRoom => "Reading Room",
            Self::ELibrary => "E-Library",
        }
    }

    /// The seat pool this label draws from.
    pub fn pool(&self) -> SeatPool {
        match self {
            Self::CentralLibrary => SeatPool::Central,
            Self::Reference | Self::ReferenceStudy => SeatPool::Reference,
            Self::ReadingRoom => SeatPool::Reading,
            Self::ELibrary => SeatPool::ELibrary,
        }
    }

    /// Whether this is the evening study variant.
    pub fn is_study(&self) -> bool {
        matches!(self, Self::ReferenceStudy)
    }
}

impl fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A capacity bucket shared by one or more labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatPool {
    Central,
    Reference,
    Reading,
    #[serde(rename = "elibrary")]
    ELibrary,
}

impl SeatPool {
    /// All pools in reporting order.
    pub const ALL: [SeatPool; 4] = [Self::Central, Self::Reference, Self::Reading, Self::ELibrary];

    /// Labels that draw from this pool.
    pub fn labels(&self) -> &'static [SectionLabel] {
        match self {
            Self::Central => &[SectionLabel::CentralLibrary],
            Self::Reference => &[SectionLabel::Reference, SectionLabel::ReferenceStudy],
            Self::Reading => &[SectionLabel::ReadingRoom],
            Self::ELibrary => &[SectionLabel::ELibrary],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(Section::from_code(" Reference "), Some(Section::Reference));
        assert_eq!(Section::from_code("ELIBRARY"), Some(Section::ELibrary));
        assert_eq!(Section::from_code("basement"), None);
        assert!("basement".parse::<Section>().is_err());
    }

    #[test]
    fn test_reference_label_follows_cutoff() {
        let cutoff = hm(16, 30);
        assert_eq!(
            Section::Reference.resolve_label(hm(10, 0), cutoff),
            SectionLabel::Reference
        );
        assert_eq!(
            Section::Reference.resolve_label(hm(16, 30), cutoff),
            SectionLabel::ReferenceStudy
        );
        assert_eq!(
            Section::Reference.resolve_label(hm(16, 35), cutoff),
            SectionLabel::ReferenceStudy
        );
        assert_eq!(
            Section::Central.resolve_label(hm(18, 0), cutoff),
            SectionLabel::CentralLibrary
        );
    }

    #[test]
    fn test_every_label_maps_back_to_its_pool() {
        for pool in SeatPool::ALL {
            for label in pool.labels() {
                assert_eq!(label.pool(), pool);
            }
        }
    }

    #[test]
    fn test_label_wire_format() {
        let json = serde_json::to_string(&SectionLabel::ReferenceStudy).unwrap();
        assert_eq!(json, "\"Reference - Study Section\"");
        let pool = serde_json::to_string(&SeatPool::ELibrary).unwrap();
        assert_eq!(pool, "\"elibrary\"");
    }
}
