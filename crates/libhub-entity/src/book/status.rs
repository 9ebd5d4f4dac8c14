//! Book circulation status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a title can circulate at all, independent of copy count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "book_status", rename_all = "PascalCase")]
pub enum BookStatus {
    /// On the shelf and lendable.
    Available,
    /// Reported lost.
    Lost,
    /// Damaged beyond lending.
    Damaged,
    /// Removed from circulation.
    Withdrawn,
}

impl BookStatus {
    /// Return the status label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Lost => "Lost",
            Self::Damaged => "Damaged",
            Self::Withdrawn => "Withdrawn",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
