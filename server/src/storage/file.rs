//! File-backed key-value store
//!
//! The whole namespace is one JSON object (`{"key": "value", ...}`) on disk.
//! Every write is a read-modify-write of that file, serialized through an
//! in-process lock. Writes from another process are not coordinated.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::service::KeyValueStore;
use super::types::StorageError;

type Namespace = HashMap<String, String>;

/// Key-value store persisted to a single JSON file
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_namespace(&self) -> Result<Namespace, StorageError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Namespace::new()),
            Err(e) => return Err(StorageError::Io(e)),
        };

        if contents.trim().is_empty() {
            return Ok(Namespace::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    /// Read the namespace for modification. A corrupt file is replaced rather
    /// than blocking every future write.
    async fn read_for_update(&self) -> Result<Namespace, StorageError> {
        match self.read_namespace().await {
            Err(StorageError::Corrupt(reason)) => {
                warn!("Discarding corrupt storage file: {}", reason);
                Ok(Namespace::new())
            }
            other => other,
        }
    }

    async fn write_namespace(&self, namespace: &Namespace) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(namespace)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;

        // Write to a sibling file first so a crash never leaves half a namespace
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, contents).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(
            "Wrote {} keys to storage file {:?}",
            namespace.len(),
            self.path
        );
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let namespace = self.read_namespace().await?;
        Ok(namespace.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut namespace = self.read_for_update().await?;
        namespace.insert(key.to_string(), value.to_string());
        self.write_namespace(&namespace).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut namespace = self.read_for_update().await?;
        if namespace.remove(key).is_none() {
            return Ok(());
        }
        self.write_namespace(&namespace).await
    }
}
