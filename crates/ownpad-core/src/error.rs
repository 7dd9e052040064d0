use thiserror::Error;

use crate::types::StorageHandle;

#[derive(Debug, Error)]
pub enum OwnpadError {
    // IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Config
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file not found at {0}; run `ownpad init` first")]
    ConfigNotFound(String),

    #[error("TOML deserialization error: {0}")]
    TomlDe(String),

    #[error("TOML serialization error: {0}")]
    TomlSer(String),

    // Identifier codec
    #[error("Malformed storage name: {0}")]
    Codec(String),

    // Record store
    #[error("No storage record for {0}")]
    NotFound(String),

    #[error("Record store error: {0}")]
    Persistence(String),

    #[error("Invalid storage record: {0}")]
    Deserialization(String),

    // Remote storage
    #[error("Remote storage initialization failed: {reason}")]
    RemoteInit {
        reason: String,
        /// The handle the client produced, always marked `Invalid`.
        handle: Box<StorageHandle>,
    },

    #[error("Token validation failed: {0}")]
    Validation(String),
}

impl OwnpadError {
    /// Build a `RemoteInit` error, forcing the handle's status to `Invalid`.
    pub fn remote_init(reason: impl Into<String>, mut handle: StorageHandle) -> Self {
        handle.invalidate();
        OwnpadError::RemoteInit {
            reason: reason.into(),
            handle: Box::new(handle),
        }
    }

    /// The failed handle carried by a `RemoteInit` error.
    pub fn failed_handle(&self) -> Option<&StorageHandle> {
        match self {
            OwnpadError::RemoteInit { handle, .. } => Some(handle),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OwnpadError>;
