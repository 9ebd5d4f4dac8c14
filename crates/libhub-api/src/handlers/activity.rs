//! Seat ledger handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use libhub_entity::activity::ActivityLog;
use libhub_service::SeatAvailability;

use crate::dto::request::{SeatRequest, TransferRequest};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /check-in
pub async fn check_in(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SeatRequest>,
) -> Result<(StatusCode, Json<ActivityLog>), ApiError> {
    require_admin(&auth)?;
    let log = state
        .seat_ledger
        .check_in(&req.roll_number, &req.section, state.now())
        .await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// POST /check-out
pub async fn check_out(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SeatRequest>,
) -> Result<Json<ActivityLog>, ApiError> {
    require_admin(&auth)?;
    let log = state
        .seat_ledger
        .check_out(&req.roll_number, &req.section, state.now())
        .await?;
    Ok(Json(log))
}

/// POST /transfer
pub async fn transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<TransferRequest>,
) -> Result<Json<ActivityLog>, ApiError> {
    require_admin(&auth)?;
    let log = state
        .seat_ledger
        .transfer(
            &req.roll_number,
            &req.from_section,
            &req.to_section,
            state.now(),
            req.is_study_section,
        )
        .await?;
    Ok(Json(log))
}

/// GET /today
pub async fn today_logs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    require_admin(&auth)?;
    let logs = state.seat_ledger.today_logs(state.now()).await?;
    Ok(Json(logs))
}

/// GET /seats
pub async fn seat_availability(
    State(state): State<AppState>,
) -> Result<Json<SeatAvailability>, ApiError> {
    let seats = state.seat_ledger.seat_availability(state.now()).await?;
    Ok(Json(seats))
}
