//! Mediasweep Cleanup
//!
//! Removes the objects derived from a stored asset (its optimized rendition,
//! transformed variants, document previews) when the asset goes away.
//!
//! Each asset type is handled by an [`AssetManager`]; the [`ManagerRegistry`]
//! picks the manager for a key and the [`CleanupHandler`] drives one cleanup
//! per deleted key.

pub mod document;
pub mod error;
pub mod handler;
pub mod image;
pub mod manager;
pub mod registry;

// Re-export commonly used types
pub use document::DocumentManager;
pub use error::CleanupError;
pub use handler::{BatchSummary, CleanupHandler, CleanupOutcome, CleanupPlan, KeyResult, SkipReason};
pub use image::ImageManager;
pub use manager::{AssetManager, CleanupReport, ManagerInfo};
pub use registry::ManagerRegistry;

// Test helpers (only available in test mode)
#[cfg(test)]
pub mod test_helpers;
