use std::collections::HashMap;
use std::sync::Arc;

use ownpad_core::StorageHandle;
use tokio::sync::RwLock;

/// Live storage handles by storage name. No eviction: entries stay until removed.
#[derive(Default)]
pub struct HandleCache {
    handles: RwLock<HashMap<String, Arc<StorageHandle>>>,
}

impl HandleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &str) -> Option<Arc<StorageHandle>> {
        self.handles.read().await.get(name).cloned()
    }

    /// Cache `handle` under `name`, replacing any previous handle.
    pub async fn insert(&self, name: &str, handle: StorageHandle) -> Arc<StorageHandle> {
        let handle = Arc::new(handle);
        self.handles
            .write()
            .await
            .insert(name.to_string(), Arc::clone(&handle));
        handle
    }

    pub async fn remove(&self, name: &str) -> Option<Arc<StorageHandle>> {
        self.handles.write().await.remove(name)
    }

    /// Cached names, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handles.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.handles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.handles.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ownpad_core::{BearerToken, ConnectionParams, StorageStatus};

    fn handle(address: &str) -> StorageHandle {
        let params = ConnectionParams {
            storage_address: address.to_string(),
            bearer_token: BearerToken::new("t"),
            storage_api: "simple".to_string(),
        };
        StorageHandle::new(params, StorageStatus::Ready, String::new())
    }

    #[tokio::test]
    async fn insert_replaces_previous_handle() {
        let cache = HandleCache::new();
        let first = cache.insert("alice", handle("https://a/1")).await;
        let second = cache.insert("alice", handle("https://a/2")).await;

        let cached = cache.get("alice").await.unwrap();
        assert!(Arc::ptr_eq(&cached, &second));
        assert!(!Arc::ptr_eq(&cached, &first));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn remove_and_clear() {
        let cache = HandleCache::new();
        cache.insert("bob", handle("https://b")).await;
        cache.insert("alice", handle("https://a")).await;
        assert_eq!(cache.names().await, vec!["alice", "bob"]);

        let removed = cache.remove("bob").await.unwrap();
        assert_eq!(removed.params.storage_address, "https://b");
        assert!(cache.get("bob").await.is_none());
        assert!(cache.remove("bob").await.is_none());

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
