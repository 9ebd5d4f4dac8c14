//! # libhub-core
//!
//! Core crate for LibHub. Contains configuration schemas, the injectable
//! clock, the blob storage trait and the unified error system.
//!
//! This crate has **no** internal dependencies on other LibHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
