//! Borrow record entities.

pub mod model;
pub mod status;

pub use model::{AdminAction, BorrowRecord, BorrowRecordView};
pub use sqlx::types::Json;
pub use status::{BorrowStatus, PaymentStatus};
