//! The storage trait all policy store backends implement.

use async_trait::async_trait;

use crate::error::StorageError;

/// Fetch-by-key / put-by-key blob storage for policy documents.
///
/// Implementations must be thread-safe (`Send + Sync`). A `put` to an
/// existing key is an atomic whole-object replace; readers of the store
/// never observe a partially written object.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Fetches the object stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no object exists under `key`,
    /// `StorageError::Connection` if the backend is unreachable.
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Stores `bytes` under `key`, overwriting any existing object.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` or `StorageError::Internal` if the
    /// write did not complete; a failed put leaves no partial object behind.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
