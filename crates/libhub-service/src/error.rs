//! Domain errors raised by the ledgers.

use thiserror::Error;

use libhub_core::error::AppError;

/// Why a ledger operation was refused.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid section: '{0}'")]
    InvalidSection(String),

    #[error("Student is already checked in to {section}")]
    AlreadyCheckedIn { section: String },

    #[error("No active check-in found for this student in the specified section")]
    NoActiveCheckIn,

    #[error("No seats available in {section}")]
    SeatUnavailable { section: String },

    #[error("Selected user is not a student")]
    NotAStudent,

    #[error("No copies available")]
    NoCopiesAvailable,

    #[error("Book is {status} and cannot be borrowed")]
    BookNotAvailable { status: String },

    #[error(
        "Maximum borrow limit reached. Students can only borrow up to {limit} books at a time."
    )]
    BorrowLimitExceeded { limit: i64 },

    #[error("Book already returned")]
    AlreadyReturned,

    #[error("Cannot update returned record")]
    CannotUpdateReturned,

    #[error("No fine to {action}")]
    NoFineOwed { action: &'static str },

    #[error("Fine already paid")]
    AlreadyPaid,

    #[error("Fine already waived")]
    AlreadyWaived,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(msg) => AppError::not_found(msg),
            LedgerError::Validation(_) | LedgerError::InvalidSection(_) => {
                AppError::validation(err.to_string())
            }
            LedgerError::Store(inner) => inner,
            other => AppError::conflict(other.to_string()),
        }
    }
}
