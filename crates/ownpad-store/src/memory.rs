use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use ownpad_core::{OwnpadError, Result};

use crate::provider::RecordStore;

/// Process-local record store. Records vanish with the process.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> OwnpadError {
    OwnpadError::Persistence("memory record store lock poisoned".into())
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let records = self.records.lock().map_err(|_| poisoned())?;
        Ok(records.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut records = self.records.lock().map_err(|_| poisoned())?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_is_none() {
        let store = MemoryRecordStore::new();
        assert_eq!(store.get("alice").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn set_overwrites() {
        let store = MemoryRecordStore::new();
        store.set("alice", "one").await.unwrap();
        store.set("alice", "two").await.unwrap();
        assert_eq!(store.get("alice").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }
}
