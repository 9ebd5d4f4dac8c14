//! Transactional unit of work over a PostgreSQL transaction.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use libhub_core::error::{AppError, ErrorKind};
use libhub_core::result::AppResult;
use libhub_entity::book::{Book, BookAuditEntry};
use libhub_entity::borrow::BorrowRecord;
use libhub_entity::user::User;

use crate::store::{TransactionalStore, UnitOfWork};

/// Opens [`PgUnitOfWork`]s on a pool.
#[derive(Debug, Clone)]
pub struct PgTransactionalStore {
    pool: PgPool,
}

impl PgTransactionalStore {
    /// Create a new transactional store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionalStore for PgTransactionalStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// A unit of work backed by one database transaction.
///
/// `lock_*` reads use `SELECT ... FOR UPDATE`. Dropping the transaction
/// without commit rolls it back.
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_user(&mut self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock user", e))
    }

    async fn lock_book(&mut self, catalog_id: &str) -> AppResult<Option<Book>> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE catalog_id = $1 FOR UPDATE")
            .bind(catalog_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock book", e))
    }

    async fn lock_borrow_record(&mut self, id: Uuid) -> AppResult<Option<BorrowRecord>> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to lock borrow record", e)
            })
    }

    async fn count_open_borrows(&mut self, student_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM borrow_records WHERE student_id = $1 AND status <> 'Returned'",
        )
        .bind(student_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count open loans", e))
    }

    async fn insert_borrow_record(&mut self, record: &BorrowRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO borrow_records \
             (id, student_id, book_id, issue_date, due_date, return_date, status, \
              condition_at_issue, return_condition, return_notes, fine, payment_status, \
              payment_method, notes, issued_by, admin_actions, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
        )
        .bind(record.id)
        .bind(record.student_id)
        .bind(&record.book_id)
        .bind(record.issue_date)
        .bind(record.due_date)
        .bind(record.return_date)
        .bind(record.status)
        .bind(&record.condition_at_issue)
        .bind(&record.return_condition)
        .bind(&record.return_notes)
        .bind(record.fine)
        .bind(record.payment_status)
        .bind(&record.payment_method)
        .bind(&record.notes)
        .bind(&record.issued_by)
        .bind(&record.admin_actions)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert borrow record", e)
        })?;
        Ok(())
    }

    async fn update_borrow_record(&mut self, record: &BorrowRecord) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE borrow_records SET \
             due_date = $2, return_date = $3, status = $4, return_condition = $5, \
             return_notes = $6, fine = $7, payment_status = $8, payment_method = $9, \
             notes = $10, admin_actions = $11, updated_at = $12 \
             WHERE id = $1",
        )
        .bind(record.id)
        .bind(record.due_date)
        .bind(record.return_date)
        .bind(record.status)
        .bind(&record.return_condition)
        .bind(&record.return_notes)
        .bind(record.fine)
        .bind(record.payment_status)
        .bind(&record.payment_method)
        .bind(&record.notes)
        .bind(&record.admin_actions)
        .bind(record.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update borrow record", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Borrow record {} not found", record.id)));
        }
        Ok(())
    }

    async fn update_book(&mut self, book: &Book) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE books SET available = $2, times_loaned = $3, last_borrowed = $4, \
             updated_at = $5 WHERE catalog_id = $1",
        )
        .bind(&book.catalog_id)
        .bind(book.available)
        .bind(book.times_loaned)
        .bind(book.last_borrowed)
        .bind(book.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update book", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Book {} not found", book.catalog_id)));
        }
        Ok(())
    }

    async fn append_book_audit(&mut self, entry: &BookAuditEntry) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO book_audit_entries (id, book_id, action, actor, details, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(entry.id)
        .bind(&entry.book_id)
        .bind(&entry.action)
        .bind(&entry.actor)
        .bind(&entry.details)
        .bind(entry.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append book audit", e))?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
        })
    }
}
