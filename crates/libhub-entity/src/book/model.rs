//! Book entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::BookStatus;

/// A catalogued title with a pool of physical copies.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// External catalog identifier (unique).
    pub catalog_id: String,
    /// Title.
    pub title: String,
    /// ISBN, if known.
    pub isbn: Option<String>,
    /// Subject categories.
    pub categories: Vec<String>,
    /// Shelf location.
    pub rack: Option<String>,
    /// Free-form type, e.g. "Reference" or "Textbook".
    pub book_type: Option<String>,
    /// Number of physical copies owned.
    pub total_copies: i32,
    /// Copies currently on the shelf.
    pub available: i32,
    /// Circulation status.
    pub status: BookStatus,
    /// Lifetime loan counter.
    pub times_loaned: i64,
    /// When the last copy was borrowed.
    pub last_borrowed: Option<DateTime<Utc>>,
    /// When the book was created.
    pub created_at: DateTime<Utc>,
    /// When the book was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Denormalized view attached to borrow record responses.
    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            catalog_id: self.catalog_id.clone(),
            title: self.title.clone(),
            isbn: self.isbn.clone(),
            categories: self.categories.clone(),
            available: self.available,
            status: self.status,
            rack: self.rack.clone(),
            book_type: self.book_type.clone(),
            times_loaned: self.times_loaned,
        }
    }
}

/// Read-side projection of a [`Book`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookSnapshot {
    pub catalog_id: String,
    pub title: String,
    pub isbn: Option<String>,
    pub categories: Vec<String>,
    pub available: i32,
    pub status: BookStatus,
    pub rack: Option<String>,
    pub book_type: Option<String>,
    pub times_loaned: i64,
}
