//! Delivery of overdue reminders.

use async_trait::async_trait;

use libhub_core::result::AppResult;
use libhub_entity::book::Book;
use libhub_entity::borrow::BorrowRecord;
use libhub_entity::user::User;

/// Delivers a reminder to a student about one loan.
///
/// Called inside the reminder's unit of work; an error rolls the
/// recorded reminder back.
#[async_trait]
pub trait ReminderNotifier: Send + Sync + std::fmt::Debug + 'static {
    async fn notify(
        &self,
        student: Option<&User>,
        record: &BorrowRecord,
        book: Option<&Book>,
    ) -> AppResult<()>;
}

/// Writes reminders to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl ReminderNotifier for LoggingNotifier {
    async fn notify(
        &self,
        student: Option<&User>,
        record: &BorrowRecord,
        book: Option<&Book>,
    ) -> AppResult<()> {
        tracing::info!(
            record_id = %record.id,
            student = student.map(|s| s.name.as_str()).unwrap_or("unknown"),
            email = student.and_then(|s| s.email.as_deref()).unwrap_or(""),
            book = book.map(|b| b.title.as_str()).unwrap_or(record.book_id.as_str()),
            due_date = %record.due_date,
            "Reminder sent"
        );
        Ok(())
    }
}
