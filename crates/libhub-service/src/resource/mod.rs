//! Digital resource catalog.

pub mod service;

pub use service::{ResourceDownload, ResourceMetadata, ResourceService, UploadedFile};
