//! Digital resource entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::category::{ResourceCategory, ResourceDepartment, ResourceStatus};

/// Catalog metadata for a file kept in blob storage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DigitalResource {
    /// Resource identifier.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Material kind.
    pub category: ResourceCategory,
    /// Owning department.
    pub department: ResourceDepartment,
    /// Description.
    pub description: String,
    /// Blob storage key.
    pub file_id: String,
    /// Original file name.
    pub file_name: String,
    /// MIME type reported at upload.
    pub mime_type: String,
    /// Size in bytes.
    pub file_size: i64,
    /// Search tags.
    pub tags: Vec<String>,
    /// Visibility.
    pub status: ResourceStatus,
    /// Download counter.
    pub downloads: i64,
    /// View counter.
    pub views: i64,
    /// Admin who uploaded it.
    pub uploaded_by: Uuid,
    /// When the resource was created.
    pub created_at: DateTime<Utc>,
    /// When the resource was last updated.
    pub updated_at: DateTime<Utc>,
}

impl DigitalResource {
    /// Whether the resource is visible to students.
    pub fn is_active(&self) -> bool {
        self.status == ResourceStatus::Active
    }

    /// Case-insensitive match over title, description and tags.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}
