//! Inputs to borrow ledger mutations.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use libhub_entity::borrow::BorrowStatus;

/// Issue one copy of a book to a student.
#[derive(Debug, Clone)]
pub struct BorrowRequest {
    pub student_id: Uuid,
    pub book_id: String,
    pub due_date: DateTime<Utc>,
    /// Defaults to the configured condition.
    pub condition: Option<String>,
    pub notes: Option<String>,
}

/// Details recorded when a copy comes back.
#[derive(Debug, Clone, Default)]
pub struct ReturnRequest {
    pub return_condition: Option<String>,
    pub return_notes: Option<String>,
}

/// Fields an admin may change on an open loan. `None` keeps the current
/// value.
#[derive(Debug, Clone, Default)]
pub struct UpdateBorrowRequest {
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<BorrowStatus>,
    pub notes: Option<String>,
}
