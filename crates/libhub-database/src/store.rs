//! Store traits consumed by the ledgers.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`]
//! and a shared in-memory implementation in [`crate::memory`]. Writes that
//! touch more than one table go through a [`UnitOfWork`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use libhub_core::config::{DatabaseBackend, DatabaseConfig};
use libhub_core::result::AppResult;
use libhub_entity::activity::{ActivityLog, SectionLabel};
use libhub_entity::book::{Book, BookAuditEntry, BookSnapshot};
use libhub_entity::borrow::BorrowRecord;
use libhub_entity::resource::{
    DigitalResource, ResourceCategory, ResourceDepartment, ResourceStatus,
};
use libhub_entity::user::User;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    ActivityLogRepository, BookRepository, BorrowRecordRepository, PgTransactionalStore,
    ResourceRepository, UserRepository,
};

/// Read access to identities owned by the auth service.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by roll number, ignoring case.
    async fn find_by_roll_number(&self, roll_number: &str) -> AppResult<Option<User>>;
}

/// Seat ledger entries.
#[async_trait]
pub trait ActivityLogStore: Send + Sync + std::fmt::Debug {
    /// The active entry of `roll_number` on `date`, in any section.
    async fn find_active(&self, roll_number: &str, date: NaiveDate)
    -> AppResult<Option<ActivityLog>>;

    /// The active entry of `roll_number` on `date` carrying one of `labels`.
    async fn find_active_in(
        &self,
        roll_number: &str,
        date: NaiveDate,
        labels: &[SectionLabel],
    ) -> AppResult<Option<ActivityLog>>;

    /// Number of active entries on `date` carrying one of `labels`.
    async fn count_active_in(&self, date: NaiveDate, labels: &[SectionLabel]) -> AppResult<i64>;

    /// All entries on `date`, newest first.
    async fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<ActivityLog>>;

    /// Checked-out entries of `roll_number` dated on or after `since`.
    async fn list_checked_out_since(
        &self,
        roll_number: &str,
        since: NaiveDate,
    ) -> AppResult<Vec<ActivityLog>>;

    /// Persist a new entry.
    async fn insert(&self, log: &ActivityLog) -> AppResult<()>;

    /// Overwrite the mutable fields of an existing entry.
    async fn update(&self, log: &ActivityLog) -> AppResult<()>;
}

/// Read access to the book catalog.
#[async_trait]
pub trait BookStore: Send + Sync + std::fmt::Debug {
    /// Find a book by catalog id.
    async fn find_by_catalog_id(&self, catalog_id: &str) -> AppResult<Option<Book>>;

    /// Snapshots for every known id in `catalog_ids`. Unknown ids are skipped.
    async fn find_snapshots(&self, catalog_ids: &[String]) -> AppResult<Vec<BookSnapshot>>;

    /// The audit trail of a book, oldest first.
    async fn audit_trail(&self, catalog_id: &str) -> AppResult<Vec<BookAuditEntry>>;
}

/// Read access to borrow records. Writes go through [`UnitOfWork`].
#[async_trait]
pub trait BorrowRecordStore: Send + Sync + std::fmt::Debug {
    /// Find a record by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BorrowRecord>>;

    /// Every record, newest first.
    async fn list_all(&self) -> AppResult<Vec<BorrowRecord>>;

    /// Records of one student, newest first.
    async fn list_by_student(&self, student_id: Uuid) -> AppResult<Vec<BorrowRecord>>;
}

/// Criteria for listing digital resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    /// Only this category.
    pub category: Option<ResourceCategory>,
    /// Only this department.
    pub department: Option<ResourceDepartment>,
    /// Case-insensitive text over title, description and tags.
    pub search: Option<String>,
}

/// Digital resource catalog.
#[async_trait]
pub trait ResourceStore: Send + Sync + std::fmt::Debug {
    /// Find a resource by id regardless of status.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DigitalResource>>;

    /// Active resources matching `filter`, newest first.
    async fn search(&self, filter: &ResourceFilter) -> AppResult<Vec<DigitalResource>>;

    /// Persist a new resource.
    async fn insert(&self, resource: &DigitalResource) -> AppResult<()>;

    /// Bump the view counter and return the updated resource.
    async fn increment_views(&self, id: Uuid) -> AppResult<Option<DigitalResource>>;

    /// Bump the download counter of an active resource and return it.
    async fn increment_downloads(&self, id: Uuid) -> AppResult<Option<DigitalResource>>;

    /// Change the status and return the updated resource.
    async fn set_status(
        &self,
        id: Uuid,
        status: ResourceStatus,
    ) -> AppResult<Option<DigitalResource>>;
}

/// A set of borrow ledger writes that commit or roll back together.
///
/// Rows returned by the `lock_*` methods stay locked until the unit ends.
/// Dropping a unit without calling [`UnitOfWork::commit`] rolls it back.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Find a user and lock it against concurrent borrows.
    async fn lock_user(&mut self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a book and lock it.
    async fn lock_book(&mut self, catalog_id: &str) -> AppResult<Option<Book>>;

    /// Find a borrow record and lock it.
    async fn lock_borrow_record(&mut self, id: Uuid) -> AppResult<Option<BorrowRecord>>;

    /// Number of non-returned records of a student.
    async fn count_open_borrows(&mut self, student_id: Uuid) -> AppResult<i64>;

    /// Persist a new borrow record.
    async fn insert_borrow_record(&mut self, record: &BorrowRecord) -> AppResult<()>;

    /// Overwrite the mutable fields of a borrow record.
    async fn update_borrow_record(&mut self, record: &BorrowRecord) -> AppResult<()>;

    /// Write back a book's counters.
    async fn update_book(&mut self, book: &Book) -> AppResult<()>;

    /// Append to a book's audit trail.
    async fn append_book_audit(&mut self, entry: &BookAuditEntry) -> AppResult<()>;

    /// Make every write of this unit visible.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discard every write of this unit.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Starts units of work.
#[async_trait]
pub trait TransactionalStore: Send + Sync + std::fmt::Debug {
    /// Begin a new unit of work.
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}

/// Every store the services need, bound to one backend.
#[derive(Debug, Clone)]
pub struct LibraryStore {
    pub users: Arc<dyn UserStore>,
    pub activity: Arc<dyn ActivityLogStore>,
    pub books: Arc<dyn BookStore>,
    pub borrows: Arc<dyn BorrowRecordStore>,
    pub resources: Arc<dyn ResourceStore>,
    pub transactions: Arc<dyn TransactionalStore>,
    pool: Option<DatabasePool>,
}

impl LibraryStore {
    /// Build the store selected by `config.backend`.
    ///
    /// The postgres backend connects and, when enabled, applies migrations.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            DatabaseBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            DatabaseBackend::Memory => {
                tracing::warn!("Using the in-memory store; data is lost on restart");
                Ok(Self::memory(MemoryStore::new()))
            }
        }
    }

    /// Store backed by PostgreSQL.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            activity: Arc::new(ActivityLogRepository::new(pg.clone())),
            books: Arc::new(BookRepository::new(pg.clone())),
            borrows: Arc::new(BorrowRecordRepository::new(pg.clone())),
            resources: Arc::new(ResourceRepository::new(pg.clone())),
            transactions: Arc::new(PgTransactionalStore::new(pg)),
            pool: Some(pool),
        }
    }

    /// Store backed by a shared [`MemoryStore`].
    pub fn memory(store: MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            activity: Arc::new(store.clone()),
            books: Arc::new(store.clone()),
            borrows: Arc::new(store.clone()),
            resources: Arc::new(store.clone()),
            transactions: Arc::new(store),
            pool: None,
        }
    }

    /// Check backend connectivity. The memory backend is always healthy.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Name of the active backend.
    pub fn backend_name(&self) -> &'static str {
        if self.pool.is_some() { "postgres" } else { "memory" }
    }

    /// Close backend connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
