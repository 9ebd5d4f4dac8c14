//! Loan and payment state enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a single loan. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "borrow_status", rename_all = "PascalCase")]
pub enum BorrowStatus {
    /// The copy is out with the student.
    Borrowed,
    /// Flagged overdue by staff.
    Overdue,
    /// The copy is back on the shelf.
    Returned,
}

impl BorrowStatus {
    /// Return the status label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Borrowed => "Borrowed",
            Self::Overdue => "Overdue",
            Self::Returned => "Returned",
        }
    }

    /// Whether the loan still counts toward the student's limit.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Returned)
    }
}

impl fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BorrowStatus {
    type Err = libhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "borrowed" => Ok(Self::Borrowed),
            "overdue" => Ok(Self::Overdue),
            "returned" => Ok(Self::Returned),
            _ => Err(libhub_core::AppError::validation(format!(
                "Invalid borrow status: '{s}'. Expected one of: Borrowed, Overdue, Returned"
            ))),
        }
    }
}

/// Fine settlement state. `Paid` and `Waived` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "PascalCase")]
pub enum PaymentStatus {
    /// A positive fine is owed.
    Pending,
    /// The fine was paid.
    Paid,
    /// The fine was forgiven.
    Waived,
}

impl PaymentStatus {
    /// Return the status label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Waived => "Waived",
        }
    }

    /// Whether no further payment transition is allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Waived)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
