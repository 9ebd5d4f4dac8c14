//! Usage analytics handlers.

use axum::Json;
use axum::extract::{Path, State};

use libhub_service::UsageSummary;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /analytics/{roll_number}
pub async fn usage_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(roll_number): Path<String>,
) -> Result<Json<UsageSummary>, ApiError> {
    require_admin(&auth)?;
    let summary = state
        .analytics
        .usage_summary(&roll_number, state.now())
        .await?;
    Ok(Json(summary))
}
