//! Mock Storage implementation for testing

use async_trait::async_trait;
use mediasweep_storage::{ListedObject, Storage, StorageBackend, StorageError, StorageResult};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A storage call observed by [`MockStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    Delete(String),
    List(String),
    Put(String),
}

/// Mock storage implementation that stores objects in memory
///
/// Listings come from the stored objects unless a response was scripted for
/// the prefix with [`MockStorage::script_listing`]; scripted responses are
/// consumed one per call, in order.
#[derive(Clone, Default)]
pub struct MockStorage {
    objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    calls: Arc<Mutex<Vec<StorageCall>>>,
    scripted_listings: Arc<Mutex<HashMap<String, VecDeque<Vec<ListedObject>>>>>,
    failing_deletes: Arc<Mutex<HashSet<String>>>,
    failing_lists: Arc<Mutex<HashSet<String>>>,
    list_delay: Arc<Mutex<Option<Duration>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an object in the mock storage
    pub fn set_object(&self, key: &str, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(key.to_string(), data);
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn object_keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    /// Queue the response of the next `list` call for `prefix`.
    pub fn script_listing(&self, prefix: &str, objects: Vec<ListedObject>) {
        self.scripted_listings
            .lock()
            .unwrap()
            .entry(prefix.to_string())
            .or_default()
            .push_back(objects);
    }

    /// Make every delete of `key` fail.
    pub fn fail_delete(&self, key: &str) {
        self.failing_deletes.lock().unwrap().insert(key.to_string());
    }

    /// Make every list of `prefix` fail.
    pub fn fail_list(&self, prefix: &str) {
        self.failing_lists.lock().unwrap().insert(prefix.to_string());
    }

    /// Sleep this long inside every `list` call.
    pub fn delay_lists(&self, delay: Duration) {
        *self.list_delay.lock().unwrap() = Some(delay);
    }

    /// All calls in the order they were made
    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deleted_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StorageCall::Delete(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StorageCall::List(prefix) => Some(prefix),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StorageCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.record(StorageCall::Delete(storage_key.to_string()));

        if self.failing_deletes.lock().unwrap().contains(storage_key) {
            return Err(StorageError::DeleteFailed(format!(
                "injected failure for {}",
                storage_key
            )));
        }

        // Missing objects are not an error.
        self.objects.lock().unwrap().remove(storage_key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<ListedObject>> {
        self.record(StorageCall::List(prefix.to_string()));

        let delay = *self.list_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_lists.lock().unwrap().contains(prefix) {
            return Err(StorageError::ListFailed(format!(
                "injected failure for {}",
                prefix
            )));
        }

        let scripted = self
            .scripted_listings
            .lock()
            .unwrap()
            .get_mut(prefix)
            .and_then(VecDeque::pop_front);
        if let Some(objects) = scripted {
            return Ok(objects);
        }

        let dir_prefix = format!("{}/", prefix.trim_end_matches('/'));
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, _)| key.starts_with(&dir_prefix))
            .map(|(key, data)| ListedObject::new(key.clone(), data.len() as u64))
            .collect())
    }

    async fn put(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()> {
        self.record(StorageCall::Put(storage_key.to_string()));
        self.set_object(storage_key, data);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self.has_object(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
