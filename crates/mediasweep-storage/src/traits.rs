//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One entry returned by [`Storage::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedObject {
    /// Object key. `None` when the backend returned an entry whose name cannot
    /// be represented as a key (for example a non UTF-8 file name).
    pub key: Option<String>,
    pub size: u64,
}

impl ListedObject {
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: Some(key.into()),
            size,
        }
    }

    pub fn without_key(size: u64) -> Self {
        Self { key: None, size }
    }
}

/// Storage abstraction trait
///
/// The cleanup handlers only depend on this trait, so any backend (or an
/// in-memory fake) can be injected. Implementations are shared between tasks
/// behind an `Arc<dyn Storage>`; they own no per-call state.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Delete an object by its storage key.
    ///
    /// Deleting a key that does not exist succeeds, matching object storage
    /// semantics, so repeated deletes are safe.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// List every object whose key lies under `prefix`.
    ///
    /// The prefix is matched per path segment: `a/b` (or `a/b/`) lists `a/b/c`
    /// but not `a/bc`. A prefix with no objects yields an empty list. No
    /// ordering is guaranteed.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<ListedObject>>;

    /// Store `data` under `storage_key`, replacing any existing object.
    async fn put(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
