//! Asset manager abstraction
//!
//! An asset manager knows which derived objects exist for one family of file
//! types and how to remove them.

use async_trait::async_trait;
use mediasweep_storage::{ListedObject, Storage};
use serde::Serialize;
use std::fmt::Debug;

use crate::error::CleanupError;

/// Trait that all asset managers must implement
#[async_trait]
pub trait AssetManager: Send + Sync + Debug {
    /// Get the manager name/identifier
    fn name(&self) -> &str;

    /// Describe the manager for listings
    fn info(&self) -> ManagerInfo;

    /// Whether this manager is responsible for `key` with the given lowercase extension.
    fn can_process(&self, key: &str, extension: &str) -> bool;

    /// Key of the single derived rendition removed unconditionally, if any.
    fn primary_key(&self, key: &str, extension: &str) -> Option<String>;

    /// Prefix under which further derived objects are discovered, if any.
    fn derived_prefix(&self, key: &str, extension: &str) -> Option<String>;

    /// Remove every derived object of `key`.
    async fn process(
        &self,
        storage: &dyn Storage,
        key: &str,
        extension: &str,
    ) -> Result<CleanupReport, CleanupError>;
}

/// Manager information for listing available managers
#[derive(Debug, Clone, Serialize)]
pub struct ManagerInfo {
    pub name: String,
    pub description: String,
    /// Extensions this manager accepts
    pub extensions: Vec<String>,
    /// Key prefixes this manager accepts
    pub key_prefixes: Vec<String>,
}

/// What one `process` call removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub manager: String,
    pub key: String,
    /// Derived rendition deleted first, if the manager has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_deleted: Option<String>,
    /// Derived objects deleted, in listing order
    pub variants_deleted: Vec<String>,
    /// Listed entries skipped because the backend returned no key for them
    pub skipped_without_key: usize,
}

impl CleanupReport {
    pub fn new(manager: &str, key: &str) -> Self {
        Self {
            manager: manager.to_string(),
            key: key.to_string(),
            primary_deleted: None,
            variants_deleted: Vec::new(),
            skipped_without_key: 0,
        }
    }

    /// Number of objects deleted, primary included
    pub fn deleted_count(&self) -> usize {
        self.variants_deleted.len() + usize::from(self.primary_deleted.is_some())
    }
}

/// List everything under `prefix`.
pub(crate) async fn list_derived(
    storage: &dyn Storage,
    prefix: &str,
) -> Result<Vec<ListedObject>, CleanupError> {
    storage
        .list(prefix)
        .await
        .map_err(|source| CleanupError::ListVariants {
            prefix: prefix.to_string(),
            source,
        })
}

/// Delete listed objects one at a time, in listing order.
///
/// Entries without a key are skipped and counted. The first failed delete
/// aborts the remaining ones.
pub(crate) async fn delete_listed(
    storage: &dyn Storage,
    prefix: &str,
    objects: Vec<ListedObject>,
    report: &mut CleanupReport,
) -> Result<(), CleanupError> {
    for object in objects {
        let key = match object.key {
            Some(key) => key,
            None => {
                report.skipped_without_key += 1;
                tracing::warn!(
                    manager = %report.manager,
                    prefix = %prefix,
                    size_bytes = object.size,
                    "Listed object has no key, skipping it"
                );
                continue;
            }
        };

        let deleted = report.variants_deleted.len();
        storage
            .delete(&key)
            .await
            .map_err(|source| CleanupError::VariantDelete {
                key: key.clone(),
                deleted,
                source,
            })?;

        report.variants_deleted.push(key);
    }

    Ok(())
}
