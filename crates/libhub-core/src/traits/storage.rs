//! Blob storage trait for digital resource files.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Opaque key/value store for uploaded files.
///
/// The catalog only keeps the key; the bytes live behind this trait. The
/// local filesystem implementation lives in `libhub-storage`.
#[async_trait]
pub trait BlobStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Store `data` under `key`, replacing any previous content.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Read the full content stored under `key`.
    async fn get(&self, key: &str) -> AppResult<Bytes>;

    /// Remove the content stored under `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Whether content exists under `key`.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
