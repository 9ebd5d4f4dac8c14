//! Borrow record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use super::status::{BorrowStatus, PaymentStatus};
use crate::book::BookSnapshot;

/// A note left on a borrow record by staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAction {
    /// What was done.
    pub note: String,
    /// Who did it.
    pub actor: String,
    /// When.
    pub at: DateTime<Utc>,
}

/// One loan of one copy of a book to one student.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Borrowing student.
    pub student_id: Uuid,
    /// Catalog id of the borrowed book.
    pub book_id: String,
    /// When the copy left the library.
    pub issue_date: DateTime<Utc>,
    /// When the copy is due back.
    pub due_date: DateTime<Utc>,
    /// When the copy came back.
    pub return_date: Option<DateTime<Utc>>,
    /// Loan state.
    pub status: BorrowStatus,
    /// Condition noted at issue.
    pub condition_at_issue: String,
    /// Condition noted at return.
    pub return_condition: Option<String>,
    /// Notes taken at return.
    pub return_notes: Option<String>,
    /// Fine owed, never negative.
    pub fine: i64,
    /// Fine settlement state, `None` until a positive fine is assessed.
    pub payment_status: Option<PaymentStatus>,
    /// How the fine was paid.
    pub payment_method: Option<String>,
    /// Staff notes.
    pub notes: Option<String>,
    /// Name of the admin who issued the loan.
    pub issued_by: String,
    /// Append-only staff action log.
    pub admin_actions: Json<Vec<AdminAction>>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl BorrowRecord {
    /// Whether the loan is still out.
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Append a staff note.
    pub fn push_admin_action(&mut self, note: impl Into<String>, actor: &str, at: DateTime<Utc>) {
        self.admin_actions.0.push(AdminAction {
            note: note.into(),
            actor: actor.to_string(),
            at,
        });
    }
}

/// A borrow record joined with a snapshot of its book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecordView {
    /// The record itself.
    #[serde(flatten)]
    pub record: BorrowRecord,
    /// Book snapshot, absent when the book row is missing.
    pub book: Option<BookSnapshot>,
}
