use mediasweep_storage::StorageError;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a cleanup invocation.
///
/// Storage failures are never retried here; the first failure ends the
/// invocation and is returned to the caller.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Failed to delete optimized object {key}: {source}")]
    PrimaryDelete {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to list derived objects under {prefix}: {source}")]
    ListVariants {
        prefix: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to delete derived object {key} after {deleted} were removed: {source}")]
    VariantDelete {
        key: String,
        /// Derived objects already removed by this invocation before the failure.
        deleted: usize,
        #[source]
        source: StorageError,
    },

    #[error("Cleanup of {key} timed out after {timeout:?}")]
    TimedOut { key: String, timeout: Duration },
}
