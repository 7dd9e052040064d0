use async_trait::async_trait;
use ownpad_core::{BearerToken, ConnectionParams, Result, StorageHandle};

/// Trait for clients that open and authorize remote storages.
#[async_trait]
pub trait RemoteStorage: Send + Sync {
    /// Open a storage. On failure the error must be
    /// [`OwnpadError::RemoteInit`](ownpad_core::OwnpadError::RemoteInit),
    /// carrying the handle marked `Invalid`.
    async fn init(&self, params: &ConnectionParams) -> Result<StorageHandle>;

    /// Check `token` against an open storage and return the handle to keep.
    ///
    /// `handle` is `None` when nothing is cached for the storage; how that is
    /// treated is up to the client.
    async fn validate(
        &self,
        handle: Option<&StorageHandle>,
        token: &BearerToken,
    ) -> Result<StorageHandle>;

    /// Client name for display.
    fn name(&self) -> &str;
}
