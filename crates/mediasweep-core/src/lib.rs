//! Mediasweep Core Library
//!
//! This crate provides configuration, the storage backend enum and the key
//! namespace conventions shared by every Mediasweep component.

pub mod config;
pub mod keys;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use keys::ImageTransformations;
pub use storage_types::StorageBackend;
