//! Borrow ledger service.
//!
//! Every mutation runs its steps against one [`UnitOfWork`] and commits
//! only when all of them succeed.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use libhub_core::config::LibraryConfig;
use libhub_database::store::{
    BookStore, BorrowRecordStore, LibraryStore, TransactionalStore, UnitOfWork, UserStore,
};
use libhub_entity::book::{AuditAction, Book, BookAuditEntry, BookStatus};
use libhub_entity::borrow::{BorrowRecord, BorrowRecordView, BorrowStatus, Json, PaymentStatus};

use super::notifier::ReminderNotifier;
use super::request::{BorrowRequest, ReturnRequest, UpdateBorrowRequest};
use crate::context::RequestContext;
use crate::error::LedgerError;
use crate::fine::{FinePolicy, calculate_fine};

/// Issues and settles loans.
#[derive(Debug, Clone)]
pub struct BorrowLedger {
    /// Identity lookups for the read path.
    users: Arc<dyn UserStore>,
    /// Book snapshots for the read path.
    books: Arc<dyn BookStore>,
    /// Borrow record queries.
    borrows: Arc<dyn BorrowRecordStore>,
    /// Units of work for mutations.
    transactions: Arc<dyn TransactionalStore>,
    /// Reminder delivery.
    notifier: Arc<dyn ReminderNotifier>,
    fines: FinePolicy,
    max_books_per_student: i64,
    default_condition: String,
    default_payment_method: String,
}

impl BorrowLedger {
    /// Creates a new borrow ledger over `store`.
    pub fn new(
        store: &LibraryStore,
        config: &LibraryConfig,
        notifier: Arc<dyn ReminderNotifier>,
    ) -> Self {
        Self {
            users: Arc::clone(&store.users),
            books: Arc::clone(&store.books),
            borrows: Arc::clone(&store.borrows),
            transactions: Arc::clone(&store.transactions),
            notifier,
            fines: FinePolicy::from_config(config),
            max_books_per_student: config.max_books_per_student,
            default_condition: config.default_condition.clone(),
            default_payment_method: config.default_payment_method.clone(),
        }
    }

    /// Issue one copy of a book to a student.
    pub async fn borrow_book(
        &self,
        ctx: &RequestContext,
        req: BorrowRequest,
        now: DateTime<Utc>,
    ) -> Result<BorrowRecordView, LedgerError> {
        if req.book_id.trim().is_empty() {
            return Err(LedgerError::Validation("Book ID is required".to_string()));
        }
        let mut uow = self.transactions.begin().await?;
        let result = self.borrow_steps(uow.as_mut(), ctx, req, now).await;
        let view = finish(uow, result).await?;

        tracing::info!(
            record_id = %view.record.id,
            student_id = %view.record.student_id,
            book_id = %view.record.book_id,
            actor = %ctx.name,
            "Book borrowed"
        );
        Ok(view)
    }

    async fn borrow_steps(
        &self,
        uow: &mut dyn UnitOfWork,
        ctx: &RequestContext,
        req: BorrowRequest,
        now: DateTime<Utc>,
    ) -> Result<BorrowRecordView, LedgerError> {
        let student = uow
            .lock_user(req.student_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound("Student not found".to_string()))?;
        if !student.is_student() {
            return Err(LedgerError::NotAStudent);
        }

        let book_id = req.book_id.trim();
        let mut book = uow
            .lock_book(book_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound("Book not found".to_string()))?;
        if book.available <= 0 {
            return Err(LedgerError::NoCopiesAvailable);
        }
        if book.status != BookStatus::Available {
            return Err(LedgerError::BookNotAvailable {
                status: book.status.as_str().to_lowercase(),
            });
        }

        let open = uow.count_open_borrows(student.id).await?;
        if open >= self.max_books_per_student {
            tracing::warn!(student_id = %student.id, open, "Borrow limit reached");
            return Err(LedgerError::BorrowLimitExceeded {
                limit: self.max_books_per_student,
            });
        }

        let mut record = BorrowRecord {
            id: Uuid::now_v7(),
            student_id: student.id,
            book_id: book.catalog_id.clone(),
            issue_date: now,
            due_date: req.due_date,
            return_date: None,
            status: BorrowStatus::Borrowed,
            condition_at_issue: non_blank(req.condition)
                .unwrap_or_else(|| self.default_condition.clone()),
            return_condition: None,
            return_notes: None,
            fine: 0,
            payment_status: None,
            payment_method: None,
            notes: non_blank(req.notes),
            issued_by: ctx.name.clone(),
            admin_actions: Json(Vec::new()),
            created_at: now,
            updated_at: now,
        };
        record.push_admin_action(format!("Issued by {}", ctx.name), &ctx.name, now);
        uow.insert_borrow_record(&record).await?;

        book.available -= 1;
        book.times_loaned += 1;
        book.last_borrowed = Some(now);
        book.updated_at = now;
        uow.update_book(&book).await?;
        uow.append_book_audit(&BookAuditEntry::new(
            &book.catalog_id,
            AuditAction::Borrowed,
            &ctx.name,
            format!("Borrowed by {}", student.name),
            now,
        ))
        .await?;

        Ok(view_of(record, Some(&book)))
    }

    /// Take a copy back, assessing any fine.
    pub async fn return_book(
        &self,
        ctx: &RequestContext,
        record_id: Uuid,
        req: ReturnRequest,
        now: DateTime<Utc>,
    ) -> Result<BorrowRecordView, LedgerError> {
        let mut uow = self.transactions.begin().await?;
        let result = self.return_steps(uow.as_mut(), ctx, record_id, req, now).await;
        let view = finish(uow, result).await?;

        tracing::info!(
            record_id = %record_id,
            fine = view.record.fine,
            actor = %ctx.name,
            "Book returned"
        );
        Ok(view)
    }

    async fn return_steps(
        &self,
        uow: &mut dyn UnitOfWork,
        ctx: &RequestContext,
        record_id: Uuid,
        req: ReturnRequest,
        now: DateTime<Utc>,
    ) -> Result<BorrowRecordView, LedgerError> {
        let mut record = lock_record(uow, record_id).await?;
        if record.status == BorrowStatus::Returned {
            return Err(LedgerError::AlreadyReturned);
        }

        // A paid or waived fine is settled and survives the return.
        if !record.payment_status.is_some_and(|p| p.is_terminal()) {
            record.fine = calculate_fine(record.due_date, now, &self.fines);
            if record.payment_status.is_none() && record.fine > 0 {
                record.payment_status = Some(PaymentStatus::Pending);
            }
        }
        record.status = BorrowStatus::Returned;
        record.return_date = Some(now);
        record.return_condition = non_blank(req.return_condition);
        record.return_notes = non_blank(req.return_notes);
        record.push_admin_action(format!("Returned by {}", ctx.name), &ctx.name, now);
        record.updated_at = now;
        uow.update_borrow_record(&record).await?;

        let student_name = student_name(uow, record.student_id).await?;
        let book = restock(uow, &record.book_id, now).await?;
        append_audit(
            uow,
            Some(&book),
            AuditAction::Returned,
            ctx,
            format!("Returned by {student_name}"),
            now,
        )
        .await?;

        Ok(view_of(record, Some(&book)))
    }

    /// Change the due date, status or notes of an open loan.
    ///
    /// A new due date recomputes the fine unless it is already settled.
    pub async fn update_record(
        &self,
        ctx: &RequestContext,
        record_id: Uuid,
        req: UpdateBorrowRequest,
        now: DateTime<Utc>,
    ) -> Result<BorrowRecordView, LedgerError> {
        let mut uow = self.transactions.begin().await?;
        let result = self.update_steps(uow.as_mut(), ctx, record_id, req, now).await;
        let view = finish(uow, result).await?;

        tracing::info!(
            record_id = %record_id,
            status = %view.record.status.as_str(),
            fine = view.record.fine,
            actor = %ctx.name,
            "Borrow record updated"
        );
        Ok(view)
    }

    async fn update_steps(
        &self,
        uow: &mut dyn UnitOfWork,
        ctx: &RequestContext,
        record_id: Uuid,
        req: UpdateBorrowRequest,
        now: DateTime<Utc>,
    ) -> Result<BorrowRecordView, LedgerError> {
        let mut record = lock_record(uow, record_id).await?;
        if record.status == BorrowStatus::Returned {
            return Err(LedgerError::CannotUpdateReturned);
        }
        if req.status == Some(BorrowStatus::Returned) {
            return Err(LedgerError::Validation(
                "Status can only be set to Borrowed or Overdue; use return to close a loan"
                    .to_string(),
            ));
        }

        if let Some(due_date) = req.due_date {
            record.due_date = due_date;
            let settled = record.payment_status.is_some_and(|p| p.is_terminal());
            if !settled {
                record.fine = calculate_fine(due_date, now, &self.fines);
                if record.payment_status.is_none() && record.fine > 0 {
                    record.payment_status = Some(PaymentStatus::Pending);
                }
            }
        }
        if let Some(status) = req.status {
            record.status = status;
        }
        if let Some(notes) = req.notes {
            record.notes = Some(notes);
        }
        record.push_admin_action(format!("Updated by {}", ctx.name), &ctx.name, now);
        record.updated_at = now;
        uow.update_borrow_record(&record).await?;

        let book = uow.lock_book(&record.book_id).await?;
        append_audit(
            uow,
            book.as_ref(),
            AuditAction::Updated,
            ctx,
            "Borrow record updated".to_string(),
            now,
        )
        .await?;

        Ok(view_of(record, book.as_ref()))
    }

    /// Record payment of a fine. An overdue loan that was never returned is
    /// closed and its copy restocked.
    pub async fn mark_fine_paid(
        &self,
        ctx: &RequestContext,
        record_id: Uuid,
        payment_method: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BorrowRecordView, LedgerError> {
        let mut uow = self.transactions.begin().await?;
        let result = self
            .pay_steps(uow.as_mut(), ctx, record_id, payment_method, now)
            .await;
        let view = finish(uow, result).await?;

        tracing::info!(
            record_id = %record_id,
            fine = view.record.fine,
            payment_method = view.record.payment_method.as_deref().unwrap_or_default(),
            actor = %ctx.name,
            "Fine marked as paid"
        );
        Ok(view)
    }

    async fn pay_steps(
        &self,
        uow: &mut dyn UnitOfWork,
        ctx: &RequestContext,
        record_id: Uuid,
        payment_method: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BorrowRecordView, LedgerError> {
        let mut record = lock_record(uow, record_id).await?;
        ensure_fine_outstanding(&record, "pay")?;

        let closes_loan = record.status == BorrowStatus::Overdue && record.return_date.is_none();
        record.payment_status = Some(PaymentStatus::Paid);
        record.payment_method =
            Some(non_blank(payment_method).unwrap_or_else(|| self.default_payment_method.clone()));
        if closes_loan {
            record.status = BorrowStatus::Returned;
            record.return_date = Some(now);
        }
        record.push_admin_action(
            format!("Fine marked as Paid by {}", ctx.name),
            &ctx.name,
            now,
        );
        record.updated_at = now;
        uow.update_borrow_record(&record).await?;

        let book = if closes_loan {
            let book = restock(uow, &record.book_id, now).await?;
            append_audit(
                uow,
                Some(&book),
                AuditAction::Returned,
                ctx,
                "Returned due to fine payment".to_string(),
                now,
            )
            .await?;
            Some(book)
        } else {
            uow.lock_book(&record.book_id).await?
        };

        Ok(view_of(record, book.as_ref()))
    }

    /// Cancel an outstanding fine. The loan status is left alone.
    pub async fn waive_fine(
        &self,
        ctx: &RequestContext,
        record_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<BorrowRecordView, LedgerError> {
        let mut uow = self.transactions.begin().await?;
        let result = self.waive_steps(uow.as_mut(), ctx, record_id, now).await;
        let view = finish(uow, result).await?;

        tracing::info!(record_id = %record_id, actor = %ctx.name, "Fine waived");
        Ok(view)
    }

    async fn waive_steps(
        &self,
        uow: &mut dyn UnitOfWork,
        ctx: &RequestContext,
        record_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<BorrowRecordView, LedgerError> {
        let mut record = lock_record(uow, record_id).await?;
        ensure_fine_outstanding(&record, "waive")?;

        record.fine = 0;
        record.payment_status = Some(PaymentStatus::Waived);
        record.push_admin_action(format!("Fine waived by {}", ctx.name), &ctx.name, now);
        record.updated_at = now;
        uow.update_borrow_record(&record).await?;

        let book = uow.lock_book(&record.book_id).await?;
        append_audit(
            uow,
            book.as_ref(),
            AuditAction::FineWaived,
            ctx,
            "Fine waived for borrow record".to_string(),
            now,
        )
        .await?;

        Ok(view_of(record, book.as_ref()))
    }

    /// Record a reminder and hand it to the notifier.
    pub async fn send_reminder(
        &self,
        ctx: &RequestContext,
        record_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let mut uow = self.transactions.begin().await?;
        let result = self.reminder_steps(uow.as_mut(), ctx, record_id, now).await;
        finish(uow, result).await?;

        tracing::info!(record_id = %record_id, actor = %ctx.name, "Reminder recorded");
        Ok(())
    }

    async fn reminder_steps(
        &self,
        uow: &mut dyn UnitOfWork,
        ctx: &RequestContext,
        record_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let mut record = lock_record(uow, record_id).await?;
        let student = uow.lock_user(record.student_id).await?;

        record.push_admin_action(format!("Reminder sent by {}", ctx.name), &ctx.name, now);
        record.updated_at = now;
        uow.update_borrow_record(&record).await?;

        let book = uow.lock_book(&record.book_id).await?;
        let name = student.as_ref().map_or("unknown student", |s| s.name.as_str());
        append_audit(
            uow,
            book.as_ref(),
            AuditAction::ReminderSent,
            ctx,
            format!("Reminder sent to {name}"),
            now,
        )
        .await?;

        self.notifier
            .notify(student.as_ref(), &record, book.as_ref())
            .await?;
        Ok(())
    }

    /// Every borrow record, newest first.
    pub async fn list_records(&self) -> Result<Vec<BorrowRecordView>, LedgerError> {
        let records = self.borrows.list_all().await?;
        self.join_books(records).await
    }

    /// Borrow history of one student, newest first.
    pub async fn student_history(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<BorrowRecordView>, LedgerError> {
        let student = self
            .users
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound("Student not found".to_string()))?;
        if !student.is_student() {
            return Err(LedgerError::NotAStudent);
        }
        let records = self.borrows.list_by_student(student_id).await?;
        self.join_books(records).await
    }

    /// Borrow history of the caller.
    pub async fn own_history(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<BorrowRecordView>, LedgerError> {
        let records = self.borrows.list_by_student(ctx.user_id).await?;
        self.join_books(records).await
    }

    async fn join_books(
        &self,
        records: Vec<BorrowRecord>,
    ) -> Result<Vec<BorrowRecordView>, LedgerError> {
        let mut seen = HashSet::new();
        let ids: Vec<String> = records
            .iter()
            .filter(|r| seen.insert(r.book_id.as_str()))
            .map(|r| r.book_id.clone())
            .collect();

        let snapshots: HashMap<String, _> = self
            .books
            .find_snapshots(&ids)
            .await?
            .into_iter()
            .map(|s| (s.catalog_id.clone(), s))
            .collect();

        Ok(records
            .into_iter()
            .map(|record| {
                let book = snapshots.get(&record.book_id).cloned();
                BorrowRecordView { record, book }
            })
            .collect())
    }
}

/// Commit on success, roll back on failure.
async fn finish<T>(
    uow: Box<dyn UnitOfWork>,
    result: Result<T, LedgerError>,
) -> Result<T, LedgerError> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback) = uow.rollback().await {
                tracing::error!(error = %rollback, "Failed to roll back unit of work");
            }
            Err(err)
        }
    }
}

async fn lock_record(
    uow: &mut dyn UnitOfWork,
    record_id: Uuid,
) -> Result<BorrowRecord, LedgerError> {
    uow.lock_borrow_record(record_id)
        .await?
        .ok_or_else(|| LedgerError::NotFound("Borrow record not found".to_string()))
}

async fn student_name(uow: &mut dyn UnitOfWork, student_id: Uuid) -> Result<String, LedgerError> {
    Ok(uow
        .lock_user(student_id)
        .await?
        .map_or_else(|| "unknown student".to_string(), |u| u.name))
}

/// Put one copy back on the shelf, never above the total.
async fn restock(
    uow: &mut dyn UnitOfWork,
    catalog_id: &str,
    now: DateTime<Utc>,
) -> Result<Book, LedgerError> {
    let mut book = uow
        .lock_book(catalog_id)
        .await?
        .ok_or_else(|| LedgerError::NotFound("Book not found".to_string()))?;
    if book.available < book.total_copies {
        book.available += 1;
    } else {
        tracing::warn!(book_id = %catalog_id, "All copies already on the shelf");
    }
    book.updated_at = now;
    uow.update_book(&book).await?;
    Ok(book)
}

async fn append_audit(
    uow: &mut dyn UnitOfWork,
    book: Option<&Book>,
    action: AuditAction,
    ctx: &RequestContext,
    details: String,
    now: DateTime<Utc>,
) -> Result<(), LedgerError> {
    if let Some(book) = book {
        uow.append_book_audit(&BookAuditEntry::new(
            &book.catalog_id,
            action,
            &ctx.name,
            details,
            now,
        ))
        .await?;
    }
    Ok(())
}

fn ensure_fine_outstanding(record: &BorrowRecord, action: &'static str) -> Result<(), LedgerError> {
    if record.fine <= 0 {
        return Err(LedgerError::NoFineOwed { action });
    }
    match record.payment_status {
        Some(PaymentStatus::Paid) => Err(LedgerError::AlreadyPaid),
        Some(PaymentStatus::Waived) => Err(LedgerError::AlreadyWaived),
        _ => Ok(()),
    }
}

fn view_of(record: BorrowRecord, book: Option<&Book>) -> BorrowRecordView {
    BorrowRecordView {
        record,
        book: book.map(Book::snapshot),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use libhub_core::error::AppError;
    use libhub_core::result::AppResult;
    use libhub_database::MemoryStore;
    use libhub_entity::user::{User, UserRole};

    use crate::borrow::LoggingNotifier;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap()
    }

    fn user(name: &str, role: UserRole) -> User {
        User {
            id: Uuid::now_v7(),
            name: name.to_string(),
            role,
            roll_number: role.is_student().then(|| format!("R-{name}")),
            branch: None,
            email: None,
            created_at: now(),
        }
    }

    fn book(catalog_id: &str, copies: i32) -> Book {
        Book {
            catalog_id: catalog_id.to_string(),
            title: format!("Title {catalog_id}"),
            isbn: None,
            categories: vec!["Computing".to_string()],
            rack: Some("A1".to_string()),
            book_type: None,
            total_copies: copies,
            available: copies,
            status: BookStatus::Available,
            times_loaned: 0,
            last_borrowed: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[derive(Debug)]
    struct FailingNotifier;

    #[async_trait::async_trait]
    impl ReminderNotifier for FailingNotifier {
        async fn notify(
            &self,
            _student: Option<&User>,
            _record: &BorrowRecord,
            _book: Option<&Book>,
        ) -> AppResult<()> {
            Err(AppError::service_unavailable("Mail relay down"))
        }
    }

    struct Fixture {
        store: MemoryStore,
        ledger: BorrowLedger,
        admin: RequestContext,
        student: User,
    }

    async fn fixture_with(notifier: Arc<dyn ReminderNotifier>) -> Fixture {
        let store = MemoryStore::new();
        let admin = user("Admin", UserRole::Admin);
        let student = user("Asha", UserRole::Student);
        store.insert_user(admin.clone()).await;
        store.insert_user(student.clone()).await;
        for id in ["B1", "B2", "B3", "B4", "B5"] {
            store.insert_book(book(id, 2)).await;
        }
        let ledger = BorrowLedger::new(
            &LibraryStore::memory(store.clone()),
            &LibraryConfig::default(),
            notifier,
        );
        Fixture {
            store,
            ledger,
            admin: RequestContext::new(admin.id, admin.role, admin.name),
            student,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(Arc::new(LoggingNotifier)).await
    }

    fn request(student: &User, book_id: &str, due_in_days: i64) -> BorrowRequest {
        BorrowRequest {
            student_id: student.id,
            book_id: book_id.to_string(),
            due_date: now() + Duration::days(due_in_days),
            condition: None,
            notes: None,
        }
    }

    async fn stored_book(store: &MemoryStore, id: &str) -> Book {
        BookStore::find_by_catalog_id(store, id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_borrow_updates_book_and_audit() {
        let f = fixture().await;
        let view = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        assert_eq!(view.record.status, BorrowStatus::Borrowed);
        assert_eq!(view.record.condition_at_issue, "New");
        assert_eq!(view.record.issued_by, "Admin");
        assert_eq!(view.book.as_ref().unwrap().available, 1);

        let book = stored_book(&f.store, "B1").await;
        assert_eq!(book.available, 1);
        assert_eq!(book.times_loaned, 1);
        assert_eq!(book.last_borrowed, Some(now()));

        let trail = f.store.audit_trail("B1").await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].action, "Borrowed");
        assert_eq!(trail[0].details, "Borrowed by Asha");
    }

    #[tokio::test]
    async fn test_borrow_rejections() {
        let f = fixture().await;
        let admin_user = user("Other", UserRole::Admin);
        f.store.insert_user(admin_user.clone()).await;
        let err = f
            .ledger
            .borrow_book(&f.admin, request(&admin_user, "B1", 14), now())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotAStudent));

        let err = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "NOPE", 14), now())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Book not found");

        let mut lost = book("LOST", 1);
        lost.status = BookStatus::Lost;
        f.store.insert_book(lost).await;
        let err = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "LOST", 14), now())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Book is lost and cannot be borrowed");

        let mut empty = book("EMPTY", 1);
        empty.available = 0;
        f.store.insert_book(empty).await;
        let err = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "EMPTY", 14), now())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NoCopiesAvailable));
    }

    #[tokio::test]
    async fn test_borrow_limit() {
        let f = fixture().await;
        for id in ["B1", "B2", "B3", "B4"] {
            f.ledger
                .borrow_book(&f.admin, request(&f.student, id, 14), now())
                .await
                .unwrap();
        }
        let err = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B5", 14), now())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::BorrowLimitExceeded { limit: 4 }));
        assert_eq!(stored_book(&f.store, "B5").await.available, 2);
        assert_eq!(f.ledger.list_records().await.unwrap().len(), 4);
        assert!(f.store.audit_trail("B5").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back_borrow() {
        let f = fixture().await;
        f.store.inject_book_write_failure(true);
        let err = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Store(_)));

        f.store.inject_book_write_failure(false);
        assert!(f.ledger.list_records().await.unwrap().is_empty());
        assert_eq!(stored_book(&f.store, "B1").await.available, 2);
        assert!(f.store.audit_trail("B1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_return_on_time_has_no_fine() {
        let f = fixture().await;
        let view = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        let returned = f
            .ledger
            .return_book(
                &f.admin,
                view.record.id,
                ReturnRequest {
                    return_condition: Some("Good".into()),
                    return_notes: None,
                },
                now() + Duration::days(3),
            )
            .await
            .unwrap();
        assert_eq!(returned.record.status, BorrowStatus::Returned);
        assert_eq!(returned.record.fine, 0);
        assert_eq!(returned.record.payment_status, None);
        assert_eq!(returned.record.return_condition.as_deref(), Some("Good"));
        assert_eq!(stored_book(&f.store, "B1").await.available, 2);

        let err = f
            .ledger
            .return_book(&f.admin, view.record.id, ReturnRequest::default(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyReturned));
    }

    #[tokio::test]
    async fn test_late_return_assesses_fine() {
        let f = fixture().await;
        let view = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        // Ten days late, seven of them grace.
        let late = now() + Duration::days(24);
        let returned = f
            .ledger
            .return_book(&f.admin, view.record.id, ReturnRequest::default(), late)
            .await
            .unwrap();
        assert_eq!(returned.record.fine, 3);
        assert_eq!(returned.record.payment_status, Some(PaymentStatus::Pending));

        let trail = f.store.audit_trail("B1").await.unwrap();
        assert_eq!(trail.last().unwrap().details, "Returned by Asha");
    }

    #[tokio::test]
    async fn test_update_recomputes_fine_and_guards_status() {
        let f = fixture().await;
        let view = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        let id = view.record.id;

        let err = f
            .ledger
            .update_record(
                &f.admin,
                id,
                UpdateBorrowRequest {
                    status: Some(BorrowStatus::Returned),
                    ..Default::default()
                },
                now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        let updated = f
            .ledger
            .update_record(
                &f.admin,
                id,
                UpdateBorrowRequest {
                    due_date: Some(now() - Duration::days(12)),
                    status: Some(BorrowStatus::Overdue),
                    notes: None,
                },
                now(),
            )
            .await
            .unwrap();
        assert_eq!(updated.record.status, BorrowStatus::Overdue);
        assert_eq!(updated.record.fine, 5);
        assert_eq!(updated.record.payment_status, Some(PaymentStatus::Pending));
        assert_eq!(updated.record.admin_actions.0.len(), 2);

        let cleared = f
            .ledger
            .update_record(
                &f.admin,
                id,
                UpdateBorrowRequest {
                    due_date: Some(now() + Duration::days(3)),
                    ..Default::default()
                },
                now(),
            )
            .await
            .unwrap();
        // Pending never reverts, even once the recomputed fine drops to zero.
        assert_eq!(cleared.record.fine, 0);
        assert_eq!(cleared.record.payment_status, Some(PaymentStatus::Pending));
        assert_eq!(cleared.record.status, BorrowStatus::Overdue);
    }

    async fn overdue_by_twelve_days(f: &Fixture) -> Uuid {
        let view = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        f.ledger
            .update_record(
                &f.admin,
                view.record.id,
                UpdateBorrowRequest {
                    due_date: Some(now() - Duration::days(12)),
                    ..Default::default()
                },
                now(),
            )
            .await
            .unwrap();
        view.record.id
    }

    #[tokio::test]
    async fn test_waived_fine_survives_return() {
        let f = fixture().await;
        let id = overdue_by_twelve_days(&f).await;
        f.ledger.waive_fine(&f.admin, id, now()).await.unwrap();

        let returned = f
            .ledger
            .return_book(
                &f.admin,
                id,
                ReturnRequest::default(),
                now() + Duration::days(5),
            )
            .await
            .unwrap();
        assert_eq!(returned.record.status, BorrowStatus::Returned);
        assert_eq!(returned.record.fine, 0);
        assert_eq!(returned.record.payment_status, Some(PaymentStatus::Waived));
        assert_eq!(stored_book(&f.store, "B1").await.available, 2);

        let err = f.ledger.waive_fine(&f.admin, id, now()).await.unwrap_err();
        assert_eq!(err.to_string(), "No fine to waive");
    }

    #[tokio::test]
    async fn test_paid_fine_survives_return() {
        let f = fixture().await;
        let id = overdue_by_twelve_days(&f).await;
        let paid = f
            .ledger
            .mark_fine_paid(&f.admin, id, Some("upi".into()), now())
            .await
            .unwrap();
        assert_eq!(paid.record.status, BorrowStatus::Borrowed);
        assert_eq!(paid.record.fine, 5);

        let returned = f
            .ledger
            .return_book(
                &f.admin,
                id,
                ReturnRequest::default(),
                now() + Duration::days(5),
            )
            .await
            .unwrap();
        assert_eq!(returned.record.status, BorrowStatus::Returned);
        assert_eq!(returned.record.fine, 5);
        assert_eq!(returned.record.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(returned.record.payment_method.as_deref(), Some("upi"));

        let err = f
            .ledger
            .mark_fine_paid(&f.admin, id, None, now())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyPaid));
    }

    #[tokio::test]
    async fn test_return_of_unknown_book_fails_and_rolls_back() {
        let f = fixture().await;
        let view = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        let orphan = BorrowRecord {
            id: Uuid::now_v7(),
            book_id: "GONE".to_string(),
            ..view.record
        };
        let mut uow = f.store.begin().await.unwrap();
        uow.insert_borrow_record(&orphan).await.unwrap();
        uow.commit().await.unwrap();

        let err = f
            .ledger
            .return_book(&f.admin, orphan.id, ReturnRequest::default(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
        assert_eq!(err.to_string(), "Book not found");

        let stored = BorrowRecordStore::find_by_id(&f.store, orphan.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BorrowStatus::Borrowed);
        assert_eq!(stored.return_date, None);
        assert!(f.store.audit_trail("GONE").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_paying_overdue_fine_closes_loan() {
        let f = fixture().await;
        let view = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        let id = view.record.id;
        f.ledger
            .update_record(
                &f.admin,
                id,
                UpdateBorrowRequest {
                    due_date: Some(now() - Duration::days(10)),
                    status: Some(BorrowStatus::Overdue),
                    notes: None,
                },
                now(),
            )
            .await
            .unwrap();
        assert_eq!(stored_book(&f.store, "B1").await.available, 1);

        let paid = f
            .ledger
            .mark_fine_paid(&f.admin, id, None, now())
            .await
            .unwrap();
        assert_eq!(paid.record.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(paid.record.payment_method.as_deref(), Some("cash"));
        assert_eq!(paid.record.status, BorrowStatus::Returned);
        assert_eq!(paid.record.return_date, Some(now()));
        assert_eq!(stored_book(&f.store, "B1").await.available, 2);

        let trail = f.store.audit_trail("B1").await.unwrap();
        assert_eq!(trail.last().unwrap().details, "Returned due to fine payment");

        let err = f
            .ledger
            .mark_fine_paid(&f.admin, id, None, now())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyPaid));
        let err = f.ledger.waive_fine(&f.admin, id, now()).await.unwrap_err();
        assert!(matches!(err, LedgerError::AlreadyPaid));
    }

    #[tokio::test]
    async fn test_waive_fine() {
        let f = fixture().await;
        let view = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        let id = view.record.id;

        let err = f.ledger.waive_fine(&f.admin, id, now()).await.unwrap_err();
        assert_eq!(err.to_string(), "No fine to waive");

        f.ledger
            .return_book(
                &f.admin,
                id,
                ReturnRequest::default(),
                now() + Duration::days(30),
            )
            .await
            .unwrap();
        let waived = f.ledger.waive_fine(&f.admin, id, now()).await.unwrap();
        assert_eq!(waived.record.fine, 0);
        assert_eq!(waived.record.payment_status, Some(PaymentStatus::Waived));
        assert_eq!(waived.record.status, BorrowStatus::Returned);

        let trail = f.store.audit_trail("B1").await.unwrap();
        assert_eq!(trail.last().unwrap().action, "Fine Waived");
    }

    #[tokio::test]
    async fn test_reminder_records_audit() {
        let f = fixture().await;
        let view = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        f.ledger
            .send_reminder(&f.admin, view.record.id, now())
            .await
            .unwrap();

        let trail = f.store.audit_trail("B1").await.unwrap();
        assert_eq!(trail.last().unwrap().action, "Reminder Sent");
        assert_eq!(trail.last().unwrap().details, "Reminder sent to Asha");

        let err = f
            .ledger
            .send_reminder(&f.admin, Uuid::now_v7(), now())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_notification_rolls_back_reminder() {
        let f = fixture_with(Arc::new(FailingNotifier)).await;
        let view = f
            .ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        let err = f
            .ledger
            .send_reminder(&f.admin, view.record.id, now())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Store(_)));

        let trail = f.store.audit_trail("B1").await.unwrap();
        assert_eq!(trail.len(), 1);
        let record = BorrowRecordStore::find_by_id(&f.store, view.record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.admin_actions.0.len(), 1);
    }

    #[tokio::test]
    async fn test_history_joins_books() {
        let f = fixture().await;
        f.ledger
            .borrow_book(&f.admin, request(&f.student, "B1", 14), now())
            .await
            .unwrap();
        f.ledger
            .borrow_book(
                &f.admin,
                request(&f.student, "B2", 14),
                now() + Duration::minutes(1),
            )
            .await
            .unwrap();

        let history = f.ledger.student_history(f.student.id).await.unwrap();
        let ids: Vec<_> = history.iter().map(|v| v.record.book_id.as_str()).collect();
        assert_eq!(ids, ["B2", "B1"]);
        assert_eq!(history[0].book.as_ref().unwrap().title, "Title B2");

        let student_ctx = RequestContext::new(f.student.id, UserRole::Student, "Asha");
        assert_eq!(f.ledger.own_history(&student_ctx).await.unwrap().len(), 2);

        let err = f
            .ledger
            .student_history(f.admin.user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotAStudent));
        let err = f
            .ledger
            .student_history(Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }
}
