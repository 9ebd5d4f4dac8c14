//! Digital resource handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;

use libhub_core::error::AppError;
use libhub_database::ResourceFilter;
use libhub_entity::resource::{DigitalResource, ResourceCategory, ResourceDepartment};
use libhub_service::resource::{ResourceMetadata, UploadedFile};

use crate::dto::request::ResourceQuery;
use crate::dto::response::ListResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, parse_uuid};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /digital-resources?category=&department=&search=
pub async fn list_resources(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ResourceQuery>,
) -> Result<Json<ListResponse<DigitalResource>>, ApiError> {
    let filter = ResourceFilter {
        category: non_empty(query.category)
            .map(|c| c.parse::<ResourceCategory>())
            .transpose()?,
        department: non_empty(query.department)
            .map(|d| d.parse::<ResourceDepartment>())
            .transpose()?,
        search: non_empty(query.search),
    };
    let resources = state.resources.list(&filter).await?;
    Ok(Json(ListResponse::new(resources)))
}

/// GET /digital-resources/{id}
pub async fn get_resource(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DigitalResource>, ApiError> {
    let resource = state.resources.get(parse_uuid(&id)?).await?;
    Ok(Json(resource))
}

/// GET /digital-resources/{id}/download
pub async fn download_resource(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let download = state.resources.download(parse_uuid(&id)?).await?;
    let resource = download.resource;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, resource.mime_type.as_str())
        .header(header::CONTENT_LENGTH, download.data.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", resource.file_name),
        )
        .body(Body::from(download.data))
        .map_err(|e| ApiError(AppError::internal(format!("Failed to build response: {e}"))))
}

/// POST /digital-resources (multipart)
///
/// Text fields: `title`, `category`, `department`, `description`, `tags`
/// (comma separated). File field: `file`.
pub async fn upload_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DigitalResource>), ApiError> {
    require_admin(&auth)?;

    let mut title = None;
    let mut category = None;
    let mut department = None;
    let mut description = None;
    let mut tags = Vec::new();
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data: Bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
            file = Some(UploadedFile {
                file_name,
                mime_type,
                data,
            });
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
        match name.as_str() {
            "title" => title = Some(text),
            "category" => category = Some(text.parse::<ResourceCategory>()?),
            "department" => department = Some(text.parse::<ResourceDepartment>()?),
            "description" => description = Some(text),
            "tags" => tags = text.split(',').map(str::to_string).collect(),
            _ => {}
        }
    }

    let metadata = ResourceMetadata {
        title: title.ok_or_else(|| AppError::validation("Title is required"))?,
        category: category.ok_or_else(|| AppError::validation("Category is required"))?,
        department: department.ok_or_else(|| AppError::validation("Department is required"))?,
        description: description.ok_or_else(|| AppError::validation("Description is required"))?,
        tags,
    };
    let file = file.ok_or_else(|| AppError::validation("File is required"))?;

    let resource = state
        .resources
        .upload(&auth, metadata, file, state.now())
        .await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

/// DELETE /digital-resources/{id}
pub async fn deactivate_resource(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DigitalResource>, ApiError> {
    require_admin(&auth)?;
    let resource = state
        .resources
        .deactivate(&auth, parse_uuid(&id)?)
        .await?;
    Ok(Json(resource))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
