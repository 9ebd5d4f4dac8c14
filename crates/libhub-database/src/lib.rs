//! # libhub-database
//!
//! Store traits consumed by the ledgers, their PostgreSQL implementations,
//! and an in-process memory store with the same transactional semantics.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{
    ActivityLogStore, BookStore, BorrowRecordStore, LibraryStore, ResourceFilter, ResourceStore,
    TransactionalStore, UnitOfWork, UserStore,
};
