//! Borrow ledger handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use libhub_entity::borrow::{BorrowRecordView, BorrowStatus};
use libhub_service::borrow::{BorrowRequest, ReturnRequest, UpdateBorrowRequest};
use libhub_service::time::parse_due_date;

use crate::dto::request::{
    BorrowBookRequest, MarkFinePaidRequest, ReturnBookRequest, UpdateBorrowRecordRequest,
};
use crate::dto::response::{ListResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, OptionalJson, ValidatedJson, parse_uuid};
use crate::middleware::rbac::{require_admin, require_student};
use crate::state::AppState;

type RecordList = Json<ListResponse<BorrowRecordView>>;

/// GET /borrow-records
pub async fn list_records(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<RecordList, ApiError> {
    require_admin(&auth)?;
    let records = state.borrow_ledger.list_records().await?;
    Ok(Json(ListResponse::new(records)))
}

/// POST /borrow-records/borrow
pub async fn borrow_book(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<BorrowBookRequest>,
) -> Result<(StatusCode, Json<BorrowRecordView>), ApiError> {
    require_admin(&auth)?;
    let due_date = parse_due_date(&req.due_date, state.config.library.timezone())?;
    let view = state
        .borrow_ledger
        .borrow_book(
            &auth,
            BorrowRequest {
                student_id: req.student_id,
                book_id: req.book_id,
                due_date,
                condition: req.condition,
                notes: req.notes,
            },
            state.now(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PATCH /borrow-records/{id}/return
pub async fn return_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    OptionalJson(req): OptionalJson<ReturnBookRequest>,
) -> Result<Json<BorrowRecordView>, ApiError> {
    require_admin(&auth)?;
    let id = parse_uuid(&id)?;
    let view = state
        .borrow_ledger
        .return_book(
            &auth,
            id,
            ReturnRequest {
                return_condition: req.return_condition,
                return_notes: req.return_notes,
            },
            state.now(),
        )
        .await?;
    Ok(Json(view))
}

/// PATCH /borrow-records/{id}
pub async fn update_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    OptionalJson(req): OptionalJson<UpdateBorrowRecordRequest>,
) -> Result<Json<BorrowRecordView>, ApiError> {
    require_admin(&auth)?;
    let id = parse_uuid(&id)?;
    let tz = state.config.library.timezone();
    let due_date = req
        .due_date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| parse_due_date(d, tz))
        .transpose()?;
    let status = req
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<BorrowStatus>)
        .transpose()?;

    let view = state
        .borrow_ledger
        .update_record(
            &auth,
            id,
            UpdateBorrowRequest {
                due_date,
                status,
                notes: req.notes,
            },
            state.now(),
        )
        .await?;
    Ok(Json(view))
}

/// POST /borrow-records/{id}/reminder
pub async fn send_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&auth)?;
    let id = parse_uuid(&id)?;
    state
        .borrow_ledger
        .send_reminder(&auth, id, state.now())
        .await?;
    Ok(Json(MessageResponse::success("Reminder sent successfully")))
}

/// PATCH /borrow-records/{id}/fine/paid
pub async fn mark_fine_paid(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    OptionalJson(req): OptionalJson<MarkFinePaidRequest>,
) -> Result<Json<BorrowRecordView>, ApiError> {
    require_admin(&auth)?;
    let id = parse_uuid(&id)?;
    let view = state
        .borrow_ledger
        .mark_fine_paid(&auth, id, req.payment_method, state.now())
        .await?;
    Ok(Json(view))
}

/// PATCH /borrow-records/{id}/fine/waived
pub async fn waive_fine(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BorrowRecordView>, ApiError> {
    require_admin(&auth)?;
    let id = parse_uuid(&id)?;
    let view = state
        .borrow_ledger
        .waive_fine(&auth, id, state.now())
        .await?;
    Ok(Json(view))
}

/// GET /borrow-records/student
pub async fn own_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<RecordList, ApiError> {
    require_student(&auth)?;
    let records = state.borrow_ledger.own_history(&auth).await?;
    Ok(Json(ListResponse::new(records)))
}

/// GET /borrow-records/student/{student_id}
pub async fn student_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<String>,
) -> Result<RecordList, ApiError> {
    require_admin(&auth)?;
    let student_id = parse_uuid(&student_id)?;
    let records = state.borrow_ledger.student_history(student_id).await?;
    Ok(Json(ListResponse::new(records)))
}
