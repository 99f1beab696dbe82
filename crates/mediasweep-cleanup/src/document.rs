//! Document manager
//!
//! Documents have no optimized rendition; the processing pipeline renders page
//! previews under `preview/{source}/`, and those are removed here.

use async_trait::async_trait;
use mediasweep_core::keys::{
    self, DOCUMENT_PREVIEW_PREFIX, OPTIMIZED_IMAGE_PREFIX, OPTIMIZED_TRANSFORMED_IMAGE_PREFIX,
    SUPPORTED_DOCUMENTS,
};
use mediasweep_storage::Storage;

use crate::error::CleanupError;
use crate::manager::{delete_listed, list_derived, AssetManager, CleanupReport, ManagerInfo};

#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentManager;

impl DocumentManager {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AssetManager for DocumentManager {
    fn name(&self) -> &str {
        "document"
    }

    fn info(&self) -> ManagerInfo {
        ManagerInfo {
            name: self.name().to_string(),
            description: "Rendered page previews of documents".to_string(),
            extensions: SUPPORTED_DOCUMENTS.iter().map(|ext| ext.to_string()).collect(),
            key_prefixes: vec![DOCUMENT_PREVIEW_PREFIX.to_string()],
        }
    }

    /// Source documents and their previews; image namespaces are never ours.
    fn can_process(&self, key: &str, extension: &str) -> bool {
        keys::is_supported_document(extension)
            && !key.starts_with(OPTIMIZED_IMAGE_PREFIX)
            && !key.starts_with(OPTIMIZED_TRANSFORMED_IMAGE_PREFIX)
    }

    fn primary_key(&self, _key: &str, _extension: &str) -> Option<String> {
        None
    }

    fn derived_prefix(&self, key: &str, _extension: &str) -> Option<String> {
        Some(keys::document_preview_key_prefix(key))
    }

    async fn process(
        &self,
        storage: &dyn Storage,
        key: &str,
        _extension: &str,
    ) -> Result<CleanupReport, CleanupError> {
        let mut report = CleanupReport::new(self.name(), key);
        let prefix = keys::document_preview_key_prefix(key);

        let previews = list_derived(storage, &prefix).await?;
        if previews.is_empty() {
            tracing::debug!(key = %key, prefix = %prefix, "No document previews found");
            return Ok(report);
        }

        delete_listed(storage, &prefix, previews, &mut report).await?;

        tracing::info!(
            key = %key,
            prefix = %prefix,
            previews_deleted = report.variants_deleted.len(),
            "Removed document previews"
        );

        Ok(report)
    }
}
