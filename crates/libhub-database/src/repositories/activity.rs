//! Activity log repository implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use libhub_core::error::{AppError, ErrorKind};
use libhub_core::result::AppResult;
use libhub_entity::activity::{ActivityLog, SectionLabel};

use crate::store::ActivityLogStore;

/// Repository over the `activity_logs` table.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    /// Create a new activity log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn label_names(labels: &[SectionLabel]) -> Vec<String> {
    labels.iter().map(|l| l.as_str().to_string()).collect()
}

#[async_trait]
impl ActivityLogStore for ActivityLogRepository {
    async fn find_active(
        &self,
        roll_number: &str,
        date: NaiveDate,
    ) -> AppResult<Option<ActivityLog>> {
        sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs \
             WHERE roll_number = $1 AND date = $2 AND status = 'Checked In' AND time_out IS NULL \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(roll_number)
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find active entry", e))
    }

    async fn find_active_in(
        &self,
        roll_number: &str,
        date: NaiveDate,
        labels: &[SectionLabel],
    ) -> AppResult<Option<ActivityLog>> {
        sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs \
             WHERE roll_number = $1 AND date = $2 AND status = 'Checked In' AND time_out IS NULL \
               AND section::TEXT = ANY($3) \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(roll_number)
        .bind(date)
        .bind(label_names(labels))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find active entry", e))
    }

    async fn count_active_in(&self, date: NaiveDate, labels: &[SectionLabel]) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM activity_logs \
             WHERE date = $1 AND status = 'Checked In' AND time_out IS NULL \
               AND section::TEXT = ANY($2)",
        )
        .bind(date)
        .bind(label_names(labels))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count active entries", e))
    }

    async fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<ActivityLog>> {
        sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs WHERE date = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list entries", e))
    }

    async fn list_checked_out_since(
        &self,
        roll_number: &str,
        since: NaiveDate,
    ) -> AppResult<Vec<ActivityLog>> {
        sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs \
             WHERE roll_number = $1 AND date >= $2 AND status = 'Checked Out' \
             ORDER BY date, time_in",
        )
        .bind(roll_number)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list visit history", e))
    }

    async fn insert(&self, log: &ActivityLog) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO activity_logs \
             (id, roll_number, name, branch, section, is_study_section, date, time_in, \
              time_out, status, duration, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(log.id)
        .bind(&log.roll_number)
        .bind(&log.name)
        .bind(&log.branch)
        .bind(log.section)
        .bind(log.is_study_section)
        .bind(log.date)
        .bind(log.time_in)
        .bind(log.time_out)
        .bind(log.status)
        .bind(&log.duration)
        .bind(log.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert entry", e))?;
        Ok(())
    }

    async fn update(&self, log: &ActivityLog) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE activity_logs \
             SET section = $2, is_study_section = $3, time_out = $4, status = $5, duration = $6 \
             WHERE id = $1",
        )
        .bind(log.id)
        .bind(log.section)
        .bind(log.is_study_section)
        .bind(log.time_out)
        .bind(log.status)
        .bind(&log.duration)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update entry", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Activity log {} not found", log.id)));
        }
        Ok(())
    }
}
