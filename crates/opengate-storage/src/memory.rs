//! In-memory policy store backend.
//!
//! Backs tests and local development. Each key maps to one blob; `put`
//! replaces the whole entry, which gives the same single-key atomic-replace
//! semantics the S3 backend provides.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StorageError;
use crate::traits::PolicyStore;

/// A concurrent map-backed `PolicyStore`.
#[derive(Debug, Default)]
pub struct MemoryPolicyStore {
    objects: DashMap<String, Vec<u8>>,
}

impl MemoryPolicyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::not_found(key))
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> Result<(), StorageError> {
        self.objects.insert(key.to_string(), bytes);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_fetch() {
        let store = MemoryPolicyStore::new();
        store
            .put("policies/a.rego", b"package a".to_vec(), "text/plain")
            .await
            .unwrap();
        let bytes = store.fetch("policies/a.rego").await.unwrap();
        assert_eq!(bytes, b"package a");
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let store = MemoryPolicyStore::new();
        let err = store.fetch("policies/missing.rego").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_put_overwrites_whole_object() {
        let store = MemoryPolicyStore::new();
        store
            .put("k", b"first".to_vec(), "text/plain")
            .await
            .unwrap();
        store
            .put("k", b"second".to_vec(), "text/plain")
            .await
            .unwrap();
        assert_eq!(store.fetch("k").await.unwrap(), b"second");
        assert_eq!(store.len(), 1);
    }
}
