//! Digital resource catalog service.
//!
//! Metadata lives in the [`ResourceStore`]; file bytes live in a
//! [`BlobStorage`] under `{resource id}/{file name}`.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use libhub_core::config::StorageConfig;
use libhub_core::error::AppError;
use libhub_core::traits::BlobStorage;
use libhub_database::store::{ResourceFilter, ResourceStore};
use libhub_entity::resource::{
    DigitalResource, ResourceCategory, ResourceDepartment, ResourceStatus,
};

use crate::context::RequestContext;

/// Descriptive fields of an upload.
#[derive(Debug, Clone)]
pub struct ResourceMetadata {
    pub title: String,
    pub category: ResourceCategory,
    pub department: ResourceDepartment,
    pub description: String,
    pub tags: Vec<String>,
}

/// An uploaded file held in memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// A resource together with its file contents.
#[derive(Debug, Clone)]
pub struct ResourceDownload {
    pub resource: DigitalResource,
    pub data: Bytes,
}

/// Lists, serves and accepts digital resources.
#[derive(Debug, Clone)]
pub struct ResourceService {
    resources: Arc<dyn ResourceStore>,
    storage: Arc<dyn BlobStorage>,
    max_upload_bytes: usize,
}

impl ResourceService {
    /// Creates a new resource service.
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        storage: Arc<dyn BlobStorage>,
        config: &StorageConfig,
    ) -> Self {
        Self {
            resources,
            storage,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Active resources matching `filter`, newest first.
    pub async fn list(&self, filter: &ResourceFilter) -> Result<Vec<DigitalResource>, AppError> {
        self.resources.search(filter).await
    }

    /// Fetch one resource and count the view.
    pub async fn get(&self, id: Uuid) -> Result<DigitalResource, AppError> {
        self.resources
            .increment_views(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))
    }

    /// Store a new file and its catalog entry.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        metadata: ResourceMetadata,
        file: UploadedFile,
        now: DateTime<Utc>,
    ) -> Result<DigitalResource, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Only admins can upload resources"));
        }
        self.validate(&metadata, &file)?;

        let id = Uuid::now_v7();
        let file_name = sanitize_file_name(&file.file_name);
        let key = format!("{id}/{file_name}");
        let size = file.data.len();
        self.storage.put(&key, file.data).await?;

        let resource = DigitalResource {
            id,
            title: metadata.title.trim().to_string(),
            category: metadata.category,
            department: metadata.department,
            description: metadata.description.trim().to_string(),
            file_id: key.clone(),
            file_name,
            mime_type: non_empty_mime(&file.mime_type),
            file_size: size as i64,
            tags: metadata
                .tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            status: ResourceStatus::Active,
            downloads: 0,
            views: 0,
            uploaded_by: ctx.user_id,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.resources.insert(&resource).await {
            if let Err(cleanup) = self.storage.delete(&key).await {
                tracing::error!(key = %key, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e);
        }

        tracing::info!(
            resource_id = %resource.id,
            size = resource.file_size,
            uploaded_by = %ctx.user_id,
            "Digital resource uploaded"
        );

        Ok(resource)
    }

    /// Read the file of an active resource and count the download.
    pub async fn download(&self, id: Uuid) -> Result<ResourceDownload, AppError> {
        let resource = self
            .resources
            .find_by_id(id)
            .await?
            .filter(DigitalResource::is_active)
            .ok_or_else(|| AppError::not_found("Resource not found"))?;

        let data = self.storage.get(&resource.file_id).await?;
        let resource = self
            .resources
            .increment_downloads(id)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;

        Ok(ResourceDownload { resource, data })
    }

    /// Hide a resource from listings and downloads.
    pub async fn deactivate(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<DigitalResource, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::authorization("Only admins can remove resources"));
        }
        let resource = self
            .resources
            .set_status(id, ResourceStatus::Inactive)
            .await?
            .ok_or_else(|| AppError::not_found("Resource not found"))?;

        tracing::info!(resource_id = %id, actor = %ctx.name, "Digital resource deactivated");
        Ok(resource)
    }

    fn validate(&self, metadata: &ResourceMetadata, file: &UploadedFile) -> Result<(), AppError> {
        if metadata.title.trim().is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        if metadata.description.trim().is_empty() {
            return Err(AppError::validation("Description is required"));
        }
        if file.data.is_empty() {
            return Err(AppError::validation("File is required"));
        }
        if file.data.len() > self.max_upload_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the maximum size of {} bytes",
                self.max_upload_bytes
            )));
        }
        Ok(())
    }
}

/// Keep a file name safe to use as a single path segment.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

fn non_empty_mime(mime: &str) -> String {
    if mime.trim().is_empty() {
        "application/octet-stream".to_string()
    } else {
        mime.trim().to_string()
    }
}
