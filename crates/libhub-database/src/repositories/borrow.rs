//! Borrow record repository implementation (read side).

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use libhub_core::error::{AppError, ErrorKind};
use libhub_core::result::AppResult;
use libhub_entity::borrow::BorrowRecord;

use crate::store::BorrowRecordStore;

/// Read-only repository over `borrow_records`.
#[derive(Debug, Clone)]
pub struct BorrowRecordRepository {
    pool: PgPool,
}

impl BorrowRecordRepository {
    /// Create a new borrow record repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorrowRecordStore for BorrowRecordRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BorrowRecord>> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find borrow record", e)
            })
    }

    async fn list_all(&self) -> AppResult<Vec<BorrowRecord>> {
        sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list borrow records", e))
    }

    async fn list_by_student(&self, student_id: Uuid) -> AppResult<Vec<BorrowRecord>> {
        sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE student_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list student borrow records", e)
        })
    }
}
