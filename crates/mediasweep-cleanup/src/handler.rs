//! Cleanup handler
//!
//! Entry point for "object deleted" notifications: validates the key, extracts
//! its extension, selects a manager and runs it against the shared storage.

use mediasweep_core::{keys, Config};
use mediasweep_storage::{ListedObject, Storage};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::CleanupError;
use crate::manager::{list_derived, CleanupReport};
use crate::registry::ManagerRegistry;

/// Why a key was not handed to any manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoExtension,
    NoManager,
}

/// Result of handling one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Processed(CleanupReport),
    Skipped {
        key: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        extension: Option<String>,
        reason: SkipReason,
    },
}

impl CleanupOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, CleanupOutcome::Processed(_))
    }
}

/// Derived objects a cleanup of `key` would remove, without removing them
#[derive(Debug, Clone, Serialize)]
pub struct CleanupPlan {
    pub key: String,
    pub manager: String,
    pub primary_key: Option<String>,
    pub derived_prefix: Option<String>,
    pub derived: Vec<ListedObject>,
}

/// Per-key entry of a [`BatchSummary`]
#[derive(Debug, Serialize)]
pub struct KeyResult {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CleanupOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<KeyResult>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Dispatches deleted keys to their asset manager
#[derive(Clone)]
pub struct CleanupHandler {
    storage: Arc<dyn Storage>,
    registry: ManagerRegistry,
    timeout: Option<Duration>,
}

impl CleanupHandler {
    pub fn new(storage: Arc<dyn Storage>, registry: ManagerRegistry) -> Self {
        Self {
            storage,
            registry,
            timeout: None,
        }
    }

    pub fn from_config(storage: Arc<dyn Storage>, registry: ManagerRegistry, config: &Config) -> Self {
        Self::new(storage, registry).with_timeout(config.cleanup_timeout())
    }

    /// Bound each invocation; on expiry the remaining work is dropped.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ManagerRegistry {
        &self.registry
    }

    /// Clean up the derived objects of one deleted key.
    #[tracing::instrument(skip(self))]
    pub async fn handle(&self, key: &str) -> Result<CleanupOutcome, CleanupError> {
        keys::validate_key(key).map_err(CleanupError::InvalidKey)?;

        let extension = match keys::extension(key) {
            Some(extension) => extension,
            None => {
                tracing::debug!("Key has no extension, nothing to clean up");
                return Ok(CleanupOutcome::Skipped {
                    key: key.to_string(),
                    extension: None,
                    reason: SkipReason::NoExtension,
                });
            }
        };

        let manager = match self.registry.find(key, &extension).await {
            Some(manager) => manager,
            None => {
                tracing::debug!(extension = %extension, "No asset manager accepts this key");
                return Ok(CleanupOutcome::Skipped {
                    key: key.to_string(),
                    extension: Some(extension),
                    reason: SkipReason::NoManager,
                });
            }
        };

        let cleanup = manager.process(self.storage.as_ref(), key, &extension);
        let report = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, cleanup)
                .await
                .map_err(|_| CleanupError::TimedOut {
                    key: key.to_string(),
                    timeout,
                })??,
            None => cleanup.await?,
        };

        tracing::info!(
            manager = %report.manager,
            deleted = report.deleted_count(),
            skipped_without_key = report.skipped_without_key,
            "Cleanup completed"
        );

        Ok(CleanupOutcome::Processed(report))
    }

    /// Handle keys one after another.
    ///
    /// A failing key is recorded and logged; the remaining keys still run.
    pub async fn handle_batch<I, S>(&self, keys: I) -> BatchSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = BatchSummary::default();

        for key in keys {
            let key = key.as_ref();
            match self.handle(key).await {
                Ok(outcome) => {
                    if outcome.is_processed() {
                        summary.processed += 1;
                    } else {
                        summary.skipped += 1;
                    }
                    summary.results.push(KeyResult {
                        key: key.to_string(),
                        outcome: Some(outcome),
                        error: None,
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, key = %key, "Cleanup failed");
                    summary.failed += 1;
                    summary.results.push(KeyResult {
                        key: key.to_string(),
                        outcome: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        summary
    }

    /// Describe what `handle(key)` would delete. `None` when no manager applies.
    pub async fn plan(&self, key: &str) -> Result<Option<CleanupPlan>, CleanupError> {
        keys::validate_key(key).map_err(CleanupError::InvalidKey)?;

        let extension = match keys::extension(key) {
            Some(extension) => extension,
            None => return Ok(None),
        };
        let manager = match self.registry.find(key, &extension).await {
            Some(manager) => manager,
            None => return Ok(None),
        };

        let derived_prefix = manager.derived_prefix(key, &extension);
        let derived = match &derived_prefix {
            Some(prefix) => list_derived(self.storage.as_ref(), prefix).await?,
            None => Vec::new(),
        };

        Ok(Some(CleanupPlan {
            key: key.to_string(),
            manager: manager.name().to_string(),
            primary_key: manager.primary_key(key, &extension),
            derived_prefix,
            derived,
        }))
    }
}
