//! Borrow ledger: loans, returns, fines and reminders.

pub mod ledger;
pub mod notifier;
pub mod request;

pub use ledger::BorrowLedger;
pub use notifier::{LoggingNotifier, ReminderNotifier};
pub use request::{BorrowRequest, ReturnRequest, UpdateBorrowRequest};
