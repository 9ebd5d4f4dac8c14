//! Book repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use libhub_core::error::{AppError, ErrorKind};
use libhub_core::result::AppResult;
use libhub_entity::book::{Book, BookAuditEntry, BookSnapshot};

use crate::store::BookStore;

/// Read-only repository over `books` and `book_audit_entries`.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    /// Create a new book repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BookRepository {
    async fn find_by_catalog_id(&self, catalog_id: &str) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE catalog_id = $1")
            .bind(catalog_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find book", e))
    }

    async fn find_snapshots(&self, catalog_ids: &[String]) -> AppResult<Vec<BookSnapshot>> {
        if catalog_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, BookSnapshot>(
            "SELECT catalog_id, title, isbn, categories, available, status, rack, book_type, \
             times_loaned FROM books WHERE catalog_id = ANY($1)",
        )
        .bind(catalog_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load book snapshots", e))
    }

    async fn audit_trail(&self, catalog_id: &str) -> AppResult<Vec<BookAuditEntry>> {
        sqlx::query_as::<_, BookAuditEntry>(
            "SELECT * FROM book_audit_entries WHERE book_id = $1 ORDER BY created_at, id",
        )
        .bind(catalog_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load audit trail", e))
    }
}
