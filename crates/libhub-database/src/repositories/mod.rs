//! PostgreSQL implementations of the store traits.

pub mod activity;
pub mod book;
pub mod borrow;
pub mod resource;
pub mod unit_of_work;
pub mod user;

pub use activity::ActivityLogRepository;
pub use book::BookRepository;
pub use borrow::BorrowRecordRepository;
pub use resource::ResourceRepository;
pub use unit_of_work::{PgTransactionalStore, PgUnitOfWork};
pub use user::UserRepository;
