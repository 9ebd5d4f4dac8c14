//! Digital resource repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use libhub_core::error::{AppError, ErrorKind};
use libhub_core::result::AppResult;
use libhub_entity::resource::{DigitalResource, ResourceStatus};

use crate::store::{ResourceFilter, ResourceStore};

/// Repository over the `digital_resources` table.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    /// Create a new resource repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build an ILIKE pattern matching `text` literally anywhere.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl ResourceStore for ResourceRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DigitalResource>> {
        sqlx::query_as::<_, DigitalResource>("SELECT * FROM digital_resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find resource", e))
    }

    async fn search(&self, filter: &ResourceFilter) -> AppResult<Vec<DigitalResource>> {
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        sqlx::query_as::<_, DigitalResource>(
            "SELECT * FROM digital_resources \
             WHERE status = 'Active' \
               AND ($1::resource_category IS NULL OR category = $1) \
               AND ($2::resource_department IS NULL OR department = $2) \
               AND ($3::TEXT IS NULL \
                    OR title ILIKE $3 OR description ILIKE $3 \
                    OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $3)) \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(filter.category)
        .bind(filter.department)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search resources", e))
    }

    async fn insert(&self, resource: &DigitalResource) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO digital_resources \
             (id, title, category, department, description, file_id, file_name, mime_type, \
              file_size, tags, status, downloads, views, uploaded_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(resource.id)
        .bind(&resource.title)
        .bind(resource.category)
        .bind(resource.department)
        .bind(&resource.description)
        .bind(&resource.file_id)
        .bind(&resource.file_name)
        .bind(&resource.mime_type)
        .bind(resource.file_size)
        .bind(&resource.tags)
        .bind(resource.status)
        .bind(resource.downloads)
        .bind(resource.views)
        .bind(resource.uploaded_by)
        .bind(resource.created_at)
        .bind(resource.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert resource", e))?;
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<Option<DigitalResource>> {
        sqlx::query_as::<_, DigitalResource>(
            "UPDATE digital_resources SET views = views + 1 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count view", e))
    }

    async fn increment_downloads(&self, id: Uuid) -> AppResult<Option<DigitalResource>> {
        sqlx::query_as::<_, DigitalResource>(
            "UPDATE digital_resources SET downloads = downloads + 1 \
             WHERE id = $1 AND status = 'Active' RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count download", e))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ResourceStatus,
    ) -> AppResult<Option<DigitalResource>> {
        sqlx::query_as::<_, DigitalResource>(
            "UPDATE digital_resources SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update resource status", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("dbms"), "%dbms%");
        assert_eq!(like_pattern("100%_sure"), "%100\\%\\_sure%");
    }
}
