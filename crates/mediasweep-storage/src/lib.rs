//! Mediasweep Storage Library
//!
//! This crate provides the storage capability used by the cleanup handlers and
//! its implementations for S3 (and S3-compatible providers) and the local
//! filesystem.
//!
//! # Storage key format
//!
//! Keys are plain `/`-separated object names such as `optimized/photos/cat.jpg`.
//! Keys must not contain `..` segments or a leading `/`. The namespaces derived
//! objects live in are defined in `mediasweep_core::keys`.
//!
//! The bucket (or local root) is bound into a backend when it is created, so
//! every operation takes only a key.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediasweep_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ListedObject, Storage, StorageError, StorageResult};
