//! Seat ledger entities and the section policy.

pub mod model;
pub mod section;

pub use model::{ActivityLog, ActivityStatus};
pub use section::{SeatPool, Section, SectionLabel};
