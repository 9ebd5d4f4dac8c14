//! Unit of work for the memory backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use libhub_core::error::AppError;
use libhub_core::result::AppResult;
use libhub_entity::book::{Book, BookAuditEntry};
use libhub_entity::borrow::BorrowRecord;
use libhub_entity::user::User;

use super::MemoryState;
use crate::store::UnitOfWork;

/// The tables a unit of work can read or write.
struct WorkingSet {
    users: HashMap<Uuid, User>,
    books: HashMap<String, Book>,
    audit: Vec<BookAuditEntry>,
    borrows: Vec<BorrowRecord>,
}

impl WorkingSet {
    fn copy_of(state: &MemoryState) -> Self {
        Self {
            users: state.users.clone(),
            books: state.books.clone(),
            audit: state.audit.clone(),
            borrows: state.borrows.clone(),
        }
    }

    fn write_into(self, state: &mut MemoryState) {
        state.users = self.users;
        state.books = self.books;
        state.audit = self.audit;
        state.borrows = self.borrows;
    }
}

/// Holds the store lock and a working copy of the loan tables.
///
/// Activity logs and digital resources are never part of a unit.
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    working: WorkingSet,
    fail_book_writes: bool,
}

impl MemoryUnitOfWork {
    pub(super) fn new(guard: OwnedMutexGuard<MemoryState>, fail_book_writes: bool) -> Self {
        let working = WorkingSet::copy_of(&guard);
        Self {
            guard,
            working,
            fail_book_writes,
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_user(&mut self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.working.users.get(&id).cloned())
    }

    async fn lock_book(&mut self, catalog_id: &str) -> AppResult<Option<Book>> {
        Ok(self.working.books.get(catalog_id).cloned())
    }

    async fn lock_borrow_record(&mut self, id: Uuid) -> AppResult<Option<BorrowRecord>> {
        Ok(self.working.borrows.iter().find(|r| r.id == id).cloned())
    }

    async fn count_open_borrows(&mut self, student_id: Uuid) -> AppResult<i64> {
        let count = self
            .working
            .borrows
            .iter()
            .filter(|r| r.student_id == student_id && r.is_open())
            .count();
        Ok(count as i64)
    }

    async fn insert_borrow_record(&mut self, record: &BorrowRecord) -> AppResult<()> {
        self.working.borrows.push(record.clone());
        Ok(())
    }

    async fn update_borrow_record(&mut self, record: &BorrowRecord) -> AppResult<()> {
        let slot = self
            .working
            .borrows
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| AppError::not_found(format!("Borrow record {} not found", record.id)))?;
        *slot = record.clone();
        Ok(())
    }

    async fn update_book(&mut self, book: &Book) -> AppResult<()> {
        if self.fail_book_writes {
            return Err(AppError::database("Injected book write failure"));
        }
        if book.available < 0 || book.available > book.total_copies {
            return Err(AppError::database(format!(
                "Book {} availability {} outside 0..={}",
                book.catalog_id, book.available, book.total_copies
            )));
        }
        let slot = self
            .working
            .books
            .get_mut(&book.catalog_id)
            .ok_or_else(|| AppError::not_found(format!("Book {} not found", book.catalog_id)))?;
        *slot = book.clone();
        Ok(())
    }

    async fn append_book_audit(&mut self, entry: &BookAuditEntry) -> AppResult<()> {
        self.working.audit.push(entry.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let Self {
            mut guard, working, ..
        } = *self;
        working.write_into(&mut guard);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}
