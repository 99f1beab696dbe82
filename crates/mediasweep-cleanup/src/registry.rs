//! Manager registry for selecting the manager of a key

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::document::DocumentManager;
use crate::image::ImageManager;
use crate::manager::{AssetManager, ManagerInfo};

/// Registry of asset managers.
///
/// Managers are consulted in registration order; the first one whose
/// `can_process` accepts a key handles it. Thread-safe: lookups take a shared
/// lock, registration an exclusive one.
#[derive(Clone)]
pub struct ManagerRegistry {
    managers: Arc<RwLock<Vec<Arc<dyn AssetManager>>>>,
}

impl ManagerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::from_managers(Vec::new())
    }

    pub fn from_managers(managers: Vec<Arc<dyn AssetManager>>) -> Self {
        Self {
            managers: Arc::new(RwLock::new(managers)),
        }
    }

    /// Registry with the image and document managers, in that order
    pub fn with_defaults() -> Self {
        Self::from_managers(vec![
            Arc::new(ImageManager::new()) as Arc<dyn AssetManager>,
            Arc::new(DocumentManager::new()) as Arc<dyn AssetManager>,
        ])
    }

    /// Register a manager
    ///
    /// A manager with the same name is replaced in place, keeping its position.
    pub async fn register(&self, manager: Arc<dyn AssetManager>) {
        let mut managers = self.managers.write().await;

        match managers.iter().position(|m| m.name() == manager.name()) {
            Some(index) => managers[index] = manager,
            None => managers.push(manager),
        }
    }

    /// Get a manager by name
    pub async fn get(&self, name: &str) -> Result<Arc<dyn AssetManager>> {
        let managers = self.managers.read().await;

        managers
            .iter()
            .find(|m| m.name() == name)
            .cloned()
            .with_context(|| format!("Asset manager '{}' not found", name))
    }

    /// List all registered managers in registration order
    pub async fn list(&self) -> Vec<ManagerInfo> {
        let managers = self.managers.read().await;
        managers.iter().map(|m| m.info()).collect()
    }

    /// Check if a manager is registered
    pub async fn contains(&self, name: &str) -> bool {
        let managers = self.managers.read().await;
        managers.iter().any(|m| m.name() == name)
    }

    /// First manager willing to process `key` with `extension`
    pub async fn find(&self, key: &str, extension: &str) -> Option<Arc<dyn AssetManager>> {
        let managers = self.managers.read().await;
        managers
            .iter()
            .find(|m| m.can_process(key, extension))
            .cloned()
    }
}

impl Default for ManagerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleanupError;
    use crate::manager::CleanupReport;
    use async_trait::async_trait;
    use mediasweep_storage::Storage;

    // Accepts every key with the configured extension.
    #[derive(Debug)]
    struct MockManager {
        name: String,
        extension: String,
    }

    impl MockManager {
        fn new(name: impl Into<String>, extension: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                extension: extension.into(),
            }
        }
    }

    #[async_trait]
    impl AssetManager for MockManager {
        fn name(&self) -> &str {
            &self.name
        }

        fn info(&self) -> ManagerInfo {
            ManagerInfo {
                name: self.name.clone(),
                description: format!("Mock {}", self.name),
                extensions: vec![self.extension.clone()],
                key_prefixes: vec![],
            }
        }

        fn can_process(&self, _key: &str, extension: &str) -> bool {
            extension == self.extension
        }

        fn primary_key(&self, _key: &str, _extension: &str) -> Option<String> {
            None
        }

        fn derived_prefix(&self, _key: &str, _extension: &str) -> Option<String> {
            None
        }

        async fn process(
            &self,
            _storage: &dyn Storage,
            key: &str,
            _extension: &str,
        ) -> Result<CleanupReport, CleanupError> {
            Ok(CleanupReport::new(&self.name, key))
        }
    }

    #[tokio::test]
    async fn test_new_registry_is_empty() {
        let registry = ManagerRegistry::new();
        assert!(registry.list().await.is_empty());
        assert!(!registry.contains("image").await);
        assert!(registry.find("optimized/a.jpg", "jpg").await.is_none());
    }

    #[tokio::test]
    async fn test_defaults_register_image_then_document() {
        let registry = ManagerRegistry::with_defaults();
        let names: Vec<String> = registry.list().await.into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["image".to_string(), "document".to_string()]);
    }

    #[tokio::test]
    async fn test_find_dispatches_by_key_and_extension() {
        let registry = ManagerRegistry::with_defaults();

        let manager = registry.find("optimized/a.jpg", "jpg").await.unwrap();
        assert_eq!(manager.name(), "image");

        let manager = registry.find("docs/a.pdf", "pdf").await.unwrap();
        assert_eq!(manager.name(), "document");

        assert!(registry.find("a.jpg", "jpg").await.is_none());
        assert!(registry.find("optimized/a.txt", "txt").await.is_none());
    }

    #[tokio::test]
    async fn test_first_registered_match_wins() {
        let registry = ManagerRegistry::new();
        registry.register(Arc::new(MockManager::new("first", "bin"))).await;
        registry.register(Arc::new(MockManager::new("second", "bin"))).await;

        let manager = registry.find("any.bin", "bin").await.unwrap();
        assert_eq!(manager.name(), "first");
    }

    #[tokio::test]
    async fn test_register_same_name_replaces_in_place() {
        let registry = ManagerRegistry::new();
        registry.register(Arc::new(MockManager::new("a", "x"))).await;
        registry.register(Arc::new(MockManager::new("b", "y"))).await;
        registry.register(Arc::new(MockManager::new("a", "z"))).await;

        let infos = registry.list().await;
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].name, "a");
        assert_eq!(infos[0].extensions, vec!["z".to_string()]);
        assert!(registry.find("k.x", "x").await.is_none());
    }

    #[tokio::test]
    async fn test_get_manager() {
        let registry = ManagerRegistry::with_defaults();
        assert_eq!(registry.get("document").await.unwrap().name(), "document");

        let result = registry.get("nonexistent").await;
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Asset manager 'nonexistent' not found"));
    }

    #[tokio::test]
    async fn test_clone_shares_registrations() {
        let registry = ManagerRegistry::new();
        let cloned = registry.clone();
        registry.register(Arc::new(MockManager::new("late", "bin"))).await;
        assert!(cloned.contains("late").await);
    }
}
