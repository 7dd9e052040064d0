//! Storage manager: hands out live storage handles by name.
//!
//! A name is served from the in-memory [`HandleCache`] when possible. On a
//! miss the persisted record is read back from the [`RecordStore`], turned
//! into connection parameters and passed to the [`RemoteStorage`] client.
//! `set` goes through the same init-and-cache step and then persists the
//! record, so a reload after restart reproduces the original handle.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use ownpad_core::config::OwnpadConfig;
use ownpad_core::{
    BearerToken, ConnectionParams, DEFAULT_CATEGORY, OwnpadError, Record, Result,
    StorageHandle, StorageInfo, StorageStatus, codec,
};
use ownpad_remote::RemoteStorage;
use ownpad_store::{RecordStore, create_record_store};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::HandleCache;

pub struct StorageManager {
    records: Arc<dyn RecordStore>,
    remote: Arc<dyn RemoteStorage>,
    cache: HandleCache,
    category: String,
    /// One gate per name with a reload, `set` or `authenticate` in flight.
    loading: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl StorageManager {
    pub fn new(records: Arc<dyn RecordStore>, remote: Arc<dyn RemoteStorage>) -> Self {
        Self {
            records,
            remote,
            cache: HandleCache::new(),
            category: DEFAULT_CATEGORY.to_string(),
            loading: Mutex::new(HashMap::new()),
        }
    }

    /// Build a manager over the record store named in `config`.
    pub async fn from_config(
        config: &OwnpadConfig,
        remote: Arc<dyn RemoteStorage>,
    ) -> Result<Self> {
        let records: Arc<dyn RecordStore> = Arc::from(create_record_store(config).await?);
        Ok(Self::new(records, remote).with_category(config.ownpad.category.clone()))
    }

    /// Category substituted into address templates.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Return the handle for `name`, reloading it from the record store on a miss.
    ///
    /// Concurrent misses for the same name share one reload.
    pub async fn get(&self, name: &str) -> Result<Arc<StorageHandle>> {
        if let Some(handle) = self.cache.get(name).await {
            debug!(name, "Storage cache hit");
            return Ok(handle);
        }

        self.gated(name, async {
            match self.cache.get(name).await {
                Some(handle) => Ok(handle),
                None => self.refresh(name).await,
            }
        })
        .await
    }

    /// Open a storage, cache its handle and persist its record.
    ///
    /// The record is checked first, so nothing is stored that a reload would
    /// reject. When the remote client fails nothing is cached or persisted,
    /// and the returned [`OwnpadError::RemoteInit`] carries the `Invalid` handle.
    pub async fn set(
        &self,
        name: &str,
        storage_info: StorageInfo,
        bearer_token: BearerToken,
    ) -> Result<StorageStatus> {
        let key = codec::encode(name)?;
        let record = Record::new(storage_info, bearer_token);
        record.validate()?;
        let data = record.to_json()?;

        self.gated(name, self.register(name, &key, &record, &data)).await
    }

    async fn register(
        &self,
        name: &str,
        key: &str,
        record: &Record,
        data: &str,
    ) -> Result<StorageStatus> {
        let params = record.connection_params(&self.category);
        self.init_and_cache(name, &params).await?;

        if let Err(e) = self.records.set(key, data).await {
            warn!(name, key = %key, store = self.records.name(), "Failed to persist storage record: {e}");
            return Err(e);
        }
        info!(name, key = %key, address = %params.storage_address, "Registered storage");
        Ok(StorageStatus::Ready)
    }

    /// Check `token` against the cached handle for `name`.
    ///
    /// Returns `true` and caches the handle the client hands back when the
    /// token is accepted, `false` when it is rejected. Call after a successful
    /// `get` or `set`; without a cached handle the outcome is up to the client.
    pub async fn authenticate(&self, name: &str, token: &BearerToken) -> Result<bool> {
        self.gated(name, async {
            let current = self.cache.get(name).await;
            match self.remote.validate(current.as_deref(), token).await {
                Ok(handle) => {
                    self.cache.insert(name, handle).await;
                    debug!(name, "Storage token accepted");
                    Ok(true)
                }
                Err(OwnpadError::Validation(reason)) => {
                    warn!(name, "Storage token rejected: {reason}");
                    Ok(false)
                }
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Drop the cached handle for `name`. The persisted record stays.
    pub async fn remove(&self, name: &str) -> Option<Arc<StorageHandle>> {
        self.cache.remove(name).await
    }

    /// Drop every cached handle, as after a restart. Persisted records stay.
    pub async fn clear(&self) {
        self.cache.clear().await;
    }

    pub async fn cached_names(&self) -> Vec<String> {
        self.cache.names().await
    }

    pub async fn len(&self) -> usize {
        self.cache.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.is_empty().await
    }

    /// Rebuild the handle for `name` from its persisted record. Never writes.
    async fn refresh(&self, name: &str) -> Result<Arc<StorageHandle>> {
        let key = codec::encode(name)?;
        info!(name, key = %key, store = self.records.name(), "Loading storage from record store");

        let raw = match self.records.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(OwnpadError::NotFound(name.to_string())),
            Err(e) => {
                warn!(name, key = %key, "Failed to read storage record: {e}");
                return Err(e);
            }
        };
        let record = Record::from_json(&raw).inspect_err(|e| {
            warn!(name, key = %key, "Stored record is unusable: {e}");
        })?;

        let params = record.connection_params(&self.category);
        self.init_and_cache(name, &params).await
    }

    async fn init_and_cache(
        &self,
        name: &str,
        params: &ConnectionParams,
    ) -> Result<Arc<StorageHandle>> {
        match self.remote.init(params).await {
            Ok(handle) => Ok(self.cache.insert(name, handle).await),
            Err(OwnpadError::RemoteInit { reason, mut handle }) => {
                handle.invalidate();
                warn!(
                    name,
                    address = %params.storage_address,
                    remote = self.remote.name(),
                    "Storage initialization failed: {reason}"
                );
                Err(OwnpadError::RemoteInit { reason, handle })
            }
            Err(e) => {
                warn!(name, remote = self.remote.name(), "Storage initialization failed: {e}");
                Err(e)
            }
        }
    }

    /// Run `op` while holding the gate for `name`, so reloads, `set` and
    /// `authenticate` on one name never interleave.
    async fn gated<T>(&self, name: &str, op: impl Future<Output = T>) -> T {
        let gate = self.loading_gate(name).await;
        let result = {
            let _gate = gate.lock().await;
            op.await
        };
        self.release_gate(name, &gate).await;
        result
    }

    async fn loading_gate(&self, name: &str) -> Arc<Mutex<()>> {
        let mut loading = self.loading.lock().await;
        Arc::clone(loading.entry(name.to_string()).or_default())
    }

    async fn release_gate(&self, name: &str, gate: &Arc<Mutex<()>>) {
        let mut loading = self.loading.lock().await;
        // The map and this caller are the only holders.
        if Arc::strong_count(gate) == 2
            && loading.get(name).is_some_and(|g| Arc::ptr_eq(g, gate))
        {
            loading.remove(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ownpad_remote::BearerRemoteStorage;
    use ownpad_store::MemoryRecordStore;

    fn manager() -> StorageManager {
        StorageManager::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(BearerRemoteStorage::new()),
        )
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let result = manager().get("nobody").await;
        assert!(matches!(result, Err(OwnpadError::NotFound(ref n)) if n == "nobody"));
    }

    #[tokio::test]
    async fn loading_gates_are_released() {
        let m = manager();
        let _ = m.get("nobody").await;
        m.set(
            "alice",
            StorageInfo::new("https://h/alice/{category}", "simple"),
            "tok".into(),
        )
        .await
        .unwrap();
        m.remove("alice").await;
        m.get("alice").await.unwrap();
        assert!(m.loading.lock().await.is_empty());
    }

    #[tokio::test]
    async fn custom_category_is_used() {
        let m = manager().with_category("notes");
        m.set(
            "alice",
            StorageInfo::new("https://h/alice/{category}", "simple"),
            "tok".into(),
        )
        .await
        .unwrap();
        let handle = m.get("alice").await.unwrap();
        assert_eq!(handle.params.storage_address, "https://h/alice/notes");
        assert_eq!(m.category(), "notes");
    }

    #[tokio::test]
    async fn malformed_name_is_rejected_before_init() {
        let m = manager();
        let result = m
            .set(
                "bad--name",
                StorageInfo::new("https://h/{category}", "simple"),
                "tok".into(),
            )
            .await;
        assert!(matches!(result, Err(OwnpadError::Codec(_))));
        assert!(m.is_empty().await);
    }
}
