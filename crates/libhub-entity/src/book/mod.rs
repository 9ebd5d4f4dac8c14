//! Book catalog entities.

pub mod audit;
pub mod model;
pub mod status;

pub use audit::{AuditAction, BookAuditEntry};
pub use model::{Book, BookSnapshot};
pub use status::BookStatus;
