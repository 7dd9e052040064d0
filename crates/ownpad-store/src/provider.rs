use async_trait::async_trait;
use ownpad_core::Result;

/// Trait for durable key-value backends holding serialized storage records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the serialized record stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a serialized record under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Backend name for display.
    fn name(&self) -> &str;
}
