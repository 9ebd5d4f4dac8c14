//! Append-only audit trail attached to a book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Actions the borrow ledger records against a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    Borrowed,
    Returned,
    Updated,
    ReminderSent,
    FineWaived,
}

impl AuditAction {
    /// Label stored in the trail.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Borrowed => "Borrowed",
            Self::Returned => "Returned",
            Self::Updated => "Updated",
            Self::ReminderSent => "Reminder Sent",
            Self::FineWaived => "Fine Waived",
        }
    }
}

/// One audit trail row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookAuditEntry {
    /// Row identifier.
    pub id: Uuid,
    /// Catalog id of the book.
    pub book_id: String,
    /// Action label, see [`AuditAction`].
    pub action: String,
    /// Name of the admin who performed the action.
    pub actor: String,
    /// Free-form detail line.
    pub details: String,
    /// When the action happened.
    pub created_at: DateTime<Utc>,
}

impl BookAuditEntry {
    /// Build a new trail entry.
    pub fn new(
        book_id: impl Into<String>,
        action: AuditAction,
        actor: impl Into<String>,
        details: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            book_id: book_id.into(),
            action: action.as_str().to_string(),
            actor: actor.into(),
            details: details.into(),
            created_at: at,
        }
    }
}
