//! # libhub-storage
//!
//! Blob storage implementations for digital resource files.

pub mod local;

pub use local::LocalBlobStorage;
