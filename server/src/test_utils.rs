//! Test Utilities Module
//!
//! Fixtures shared by unit tests. Only compiled when running tests.

#![cfg(test)]

use async_trait::async_trait;

use crate::storage::{KeyValueStore, StorageError};

/// Backend that fails every operation, like a browser with storage disabled
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_store_fails() {
        let store = FailingStore;
        assert!(store.get("k").await.is_err());
        assert!(store.set("k", "v").await.is_err());
        assert!(store.remove("k").await.is_err());
        assert!(store.contains("k").await.is_err());
    }
}
