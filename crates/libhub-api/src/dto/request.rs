//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /check-in` and `POST /check-out`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeatRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Roll number is required"))]
    pub roll_number: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Section is required"))]
    pub section: String,
}

/// Body of `POST /transfer`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Roll number is required"))]
    pub roll_number: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Source section is required"))]
    pub from_section: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Destination section is required"))]
    pub to_section: String,
    pub is_study_section: Option<bool>,
}

/// Body of `POST /borrow-records/borrow`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BorrowBookRequest {
    pub student_id: Uuid,
    #[validate(length(min = 1, message = "Book ID is required"))]
    pub book_id: String,
    /// RFC 3339 instant or `YYYY-MM-DD`.
    #[validate(length(min = 1, message = "Due date is required"))]
    pub due_date: String,
    pub condition: Option<String>,
    pub notes: Option<String>,
}

/// Body of `PATCH /borrow-records/{id}/return`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnBookRequest {
    pub return_condition: Option<String>,
    pub return_notes: Option<String>,
}

/// Body of `PATCH /borrow-records/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBorrowRecordRequest {
    pub due_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Body of `PATCH /borrow-records/{id}/fine/paid`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkFinePaidRequest {
    pub payment_method: Option<String>,
}

/// Query of `GET /digital-resources`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceQuery {
    pub category: Option<String>,
    pub department: Option<String>,
    pub search: Option<String>,
}
