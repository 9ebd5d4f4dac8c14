//! # libhub-service
//!
//! Business logic for LibHub. The seat ledger and borrow ledger hold the
//! invariants; analytics only reads; the catalog and directory services
//! wrap their stores.
//!
//! Services follow constructor injection and take `now` from the caller so
//! every time-dependent rule can be driven by a fixed clock.

pub mod analytics;
pub mod borrow;
pub mod context;
pub mod error;
pub mod fine;
pub mod resource;
pub mod seat;
pub mod student;
pub mod time;

pub use analytics::{AnalyticsAggregator, UsageSummary};
pub use borrow::{BorrowLedger, LoggingNotifier, ReminderNotifier};
pub use context::RequestContext;
pub use error::LedgerError;
pub use fine::{FinePolicy, calculate_fine};
pub use resource::ResourceService;
pub use seat::{SeatAvailability, SeatLedger, SeatPolicy};
pub use student::StudentDirectory;
