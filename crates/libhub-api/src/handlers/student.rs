//! Student directory handlers.

use axum::Json;
use axum::extract::{Path, State};

use libhub_entity::user::User;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /students/{roll_number}
pub async fn get_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(roll_number): Path<String>,
) -> Result<Json<User>, ApiError> {
    require_admin(&auth)?;
    let student = state.students.find_by_roll_number(&roll_number).await?;
    Ok(Json(student))
}
