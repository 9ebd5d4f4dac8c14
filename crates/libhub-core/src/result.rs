//! Convenience result type alias for LibHub.

use crate::error::AppError;

/// A specialized `Result` type for LibHub operations.
pub type AppResult<T> = Result<T, AppError>;
