//! Image manager
//!
//! Removes an image's optimized rendition and, for transformable formats, every
//! transformed variant generated from it.

use async_trait::async_trait;
use mediasweep_core::keys::{
    self, OPTIMIZED_IMAGE_PREFIX, OPTIMIZED_TRANSFORMED_IMAGE_PREFIX, SUPPORTED_IMAGES,
};
use mediasweep_storage::Storage;

use crate::error::CleanupError;
use crate::manager::{delete_listed, list_derived, AssetManager, CleanupReport, ManagerInfo};

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageManager;

impl ImageManager {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AssetManager for ImageManager {
    fn name(&self) -> &str {
        "image"
    }

    fn info(&self) -> ManagerInfo {
        ManagerInfo {
            name: self.name().to_string(),
            description: "Optimized images and their transformed variants".to_string(),
            extensions: SUPPORTED_IMAGES.iter().map(|ext| ext.to_string()).collect(),
            key_prefixes: vec![
                OPTIMIZED_IMAGE_PREFIX.to_string(),
                OPTIMIZED_TRANSFORMED_IMAGE_PREFIX.to_string(),
            ],
        }
    }

    fn can_process(&self, key: &str, extension: &str) -> bool {
        if !keys::is_supported_image(extension) {
            return false;
        }

        key.starts_with(OPTIMIZED_IMAGE_PREFIX) || key.starts_with(OPTIMIZED_TRANSFORMED_IMAGE_PREFIX)
    }

    fn primary_key(&self, key: &str, _extension: &str) -> Option<String> {
        Some(keys::image_key(key, None))
    }

    fn derived_prefix(&self, key: &str, extension: &str) -> Option<String> {
        if keys::is_transformable_image(extension) {
            Some(keys::optimized_transformed_image_key_prefix(key))
        } else {
            None
        }
    }

    async fn process(
        &self,
        storage: &dyn Storage,
        key: &str,
        extension: &str,
    ) -> Result<CleanupReport, CleanupError> {
        let mut report = CleanupReport::new(self.name(), key);

        let optimized_key = keys::image_key(key, None);
        storage
            .delete(&optimized_key)
            .await
            .map_err(|source| CleanupError::PrimaryDelete {
                key: optimized_key.clone(),
                source,
            })?;
        report.primary_deleted = Some(optimized_key);

        let prefix = match self.derived_prefix(key, extension) {
            Some(prefix) => prefix,
            None => {
                tracing::debug!(
                    key = %key,
                    extension = %extension,
                    "Extension is not transformable, no variants to remove"
                );
                return Ok(report);
            }
        };

        let variants = list_derived(storage, &prefix).await?;
        if variants.is_empty() {
            tracing::debug!(key = %key, prefix = %prefix, "No transformed variants found");
            return Ok(report);
        }

        delete_listed(storage, &prefix, variants, &mut report).await?;

        tracing::info!(
            key = %key,
            prefix = %prefix,
            variants_deleted = report.variants_deleted.len(),
            skipped_without_key = report.skipped_without_key,
            "Removed transformed image variants"
        );

        Ok(report)
    }
}
