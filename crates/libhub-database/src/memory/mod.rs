//! In-process store for single-node development and tests.
//!
//! All tables live in one [`MemoryState`] behind a `tokio::sync::Mutex`.
//! A unit of work holds the owned guard for its whole lifetime and writes
//! to a private copy of the state; commit swaps the copy in, drop discards
//! it. This serializes units of work the way row locks serialize them in
//! PostgreSQL.

mod unit_of_work;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use libhub_core::error::AppError;
use libhub_core::result::AppResult;
use libhub_entity::activity::{ActivityLog, ActivityStatus, SectionLabel};
use libhub_entity::book::{Book, BookAuditEntry, BookSnapshot};
use libhub_entity::borrow::BorrowRecord;
use libhub_entity::resource::{DigitalResource, ResourceStatus};
use libhub_entity::user::User;

use crate::store::{
    ActivityLogStore, BookStore, BorrowRecordStore, ResourceFilter, ResourceStore,
    TransactionalStore, UnitOfWork, UserStore,
};

pub use unit_of_work::MemoryUnitOfWork;

/// Every table of the memory backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub(crate) users: HashMap<Uuid, User>,
    pub(crate) books: HashMap<String, Book>,
    pub(crate) audit: Vec<BookAuditEntry>,
    pub(crate) borrows: Vec<BorrowRecord>,
    pub(crate) activity: Vec<ActivityLog>,
    pub(crate) resources: Vec<DigitalResource>,
}

/// Cheaply cloneable handle to a shared [`MemoryState`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_book_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a user.
    pub async fn insert_user(&self, user: User) {
        self.state.lock().await.users.insert(user.id, user);
    }

    /// Seed or replace a book.
    pub async fn insert_book(&self, book: Book) {
        self.state
            .lock()
            .await
            .books
            .insert(book.catalog_id.clone(), book);
    }

    /// Make every `update_book` inside a unit of work fail until reset.
    ///
    /// Lets callers observe that a failed unit leaves no partial writes.
    pub fn inject_book_write_failure(&self, fail: bool) {
        self.fail_book_writes.store(fail, Ordering::SeqCst);
    }

    fn book_writes_fail(&self) -> bool {
        self.fail_book_writes.load(Ordering::SeqCst)
    }
}

fn newest_first<T, F>(items: impl DoubleEndedIterator<Item = T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    // Reverse insertion order first so equal timestamps stay newest first.
    let mut out: Vec<T> = items.rev().collect();
    out.sort_by(|a, b| key(b).cmp(&key(a)));
    out
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_by_roll_number(&self, roll_number: &str) -> AppResult<Option<User>> {
        let wanted = roll_number.trim();
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| {
                u.roll_number
                    .as_deref()
                    .is_some_and(|r| r.eq_ignore_ascii_case(wanted))
            })
            .cloned())
    }
}

#[async_trait]
impl ActivityLogStore for MemoryStore {
    async fn find_active(
        &self,
        roll_number: &str,
        date: NaiveDate,
    ) -> AppResult<Option<ActivityLog>> {
        let state = self.state.lock().await;
        Ok(state
            .activity
            .iter()
            .rev()
            .find(|l| l.roll_number == roll_number && l.date == date && l.is_active())
            .cloned())
    }

    async fn find_active_in(
        &self,
        roll_number: &str,
        date: NaiveDate,
        labels: &[SectionLabel],
    ) -> AppResult<Option<ActivityLog>> {
        let state = self.state.lock().await;
        Ok(state
            .activity
            .iter()
            .rev()
            .find(|l| {
                l.roll_number == roll_number
                    && l.date == date
                    && l.is_active()
                    && labels.contains(&l.section)
            })
            .cloned())
    }

    async fn count_active_in(&self, date: NaiveDate, labels: &[SectionLabel]) -> AppResult<i64> {
        let state = self.state.lock().await;
        let count = state
            .activity
            .iter()
            .filter(|l| l.date == date && l.is_active() && labels.contains(&l.section))
            .count();
        Ok(count as i64)
    }

    async fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<ActivityLog>> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state.activity.iter().filter(|l| l.date == date).cloned(),
            |l| l.created_at,
        ))
    }

    async fn list_checked_out_since(
        &self,
        roll_number: &str,
        since: NaiveDate,
    ) -> AppResult<Vec<ActivityLog>> {
        let state = self.state.lock().await;
        let mut logs: Vec<ActivityLog> = state
            .activity
            .iter()
            .filter(|l| {
                l.roll_number == roll_number
                    && l.date >= since
                    && l.status == ActivityStatus::CheckedOut
            })
            .cloned()
            .collect();
        logs.sort_by_key(|l| (l.date, l.time_in));
        Ok(logs)
    }

    async fn insert(&self, log: &ActivityLog) -> AppResult<()> {
        self.state.lock().await.activity.push(log.clone());
        Ok(())
    }

    async fn update(&self, log: &ActivityLog) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let slot = state
            .activity
            .iter_mut()
            .find(|l| l.id == log.id)
            .ok_or_else(|| AppError::not_found(format!("Activity log {} not found", log.id)))?;
        *slot = log.clone();
        Ok(())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn find_by_catalog_id(&self, catalog_id: &str) -> AppResult<Option<Book>> {
        Ok(self.state.lock().await.books.get(catalog_id).cloned())
    }

    async fn find_snapshots(&self, catalog_ids: &[String]) -> AppResult<Vec<BookSnapshot>> {
        let state = self.state.lock().await;
        Ok(catalog_ids
            .iter()
            .filter_map(|id| state.books.get(id).map(Book::snapshot))
            .collect())
    }

    async fn audit_trail(&self, catalog_id: &str) -> AppResult<Vec<BookAuditEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .audit
            .iter()
            .filter(|e| e.book_id == catalog_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BorrowRecordStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BorrowRecord>> {
        let state = self.state.lock().await;
        Ok(state.borrows.iter().find(|r| r.id == id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<BorrowRecord>> {
        let state = self.state.lock().await;
        Ok(newest_first(state.borrows.iter().cloned(), |r| r.created_at))
    }

    async fn list_by_student(&self, student_id: Uuid) -> AppResult<Vec<BorrowRecord>> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state
                .borrows
                .iter()
                .filter(|r| r.student_id == student_id)
                .cloned(),
            |r| r.created_at,
        ))
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DigitalResource>> {
        let state = self.state.lock().await;
        Ok(state.resources.iter().find(|r| r.id == id).cloned())
    }

    async fn search(&self, filter: &ResourceFilter) -> AppResult<Vec<DigitalResource>> {
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let state = self.state.lock().await;
        Ok(newest_first(
            state
                .resources
                .iter()
                .filter(|r| r.is_active())
                .filter(|r| filter.category.is_none_or(|c| r.category == c))
                .filter(|r| filter.department.is_none_or(|d| r.department == d))
                .filter(|r| needle.is_none_or(|n| r.matches_text(n)))
                .cloned(),
            |r| r.created_at,
        ))
    }

    async fn insert(&self, resource: &DigitalResource) -> AppResult<()> {
        self.state.lock().await.resources.push(resource.clone());
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<Option<DigitalResource>> {
        let mut state = self.state.lock().await;
        Ok(state.resources.iter_mut().find(|r| r.id == id).map(|r| {
            r.views += 1;
            r.clone()
        }))
    }

    async fn increment_downloads(&self, id: Uuid) -> AppResult<Option<DigitalResource>> {
        let mut state = self.state.lock().await;
        Ok(state
            .resources
            .iter_mut()
            .find(|r| r.id == id && r.is_active())
            .map(|r| {
                r.downloads += 1;
                r.clone()
            }))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ResourceStatus,
    ) -> AppResult<Option<DigitalResource>> {
        let mut state = self.state.lock().await;
        Ok(state.resources.iter_mut().find(|r| r.id == id).map(|r| {
            r.status = status;
            r.updated_at = chrono::Utc::now();
            r.clone()
        }))
    }
}

#[async_trait]
impl TransactionalStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(MemoryUnitOfWork::new(guard, self.book_writes_fail())))
    }
}
