use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{OwnpadError, Result};

/// Placeholder in a storage address template that is replaced by the category.
pub const CATEGORY_PLACEHOLDER: &str = "{category}";

/// Category every pad storage is addressed under.
pub const DEFAULT_CATEGORY: &str = "documents";

/// Opaque credential proving the right to use a storage. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

impl From<&str> for BearerToken {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// How to address and talk to a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInfo {
    /// Address template containing `{category}`.
    pub template: String,
    /// Direct address that skips the proxy (e.g. CouchDB, which needs no CORS).
    #[serde(
        rename = "ownPadBackDoor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub back_door: Option<String>,
    /// API version/kind tag.
    pub api: String,
}

impl StorageInfo {
    pub fn new(template: impl Into<String>, api: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            back_door: None,
            api: api.into(),
        }
    }

    pub fn with_back_door(mut self, address: impl Into<String>) -> Self {
        self.back_door = Some(address.into());
        self
    }

    /// Resolve the address a handle should connect to.
    ///
    /// The backdoor wins outright; otherwise the first `{category}` in the
    /// template is replaced.
    pub fn storage_address(&self, category: &str) -> String {
        match self.back_door {
            Some(ref back_door) => back_door.clone(),
            None => self.template.replacen(CATEGORY_PLACEHOLDER, category, 1),
        }
    }
}

/// The minimal input a remote storage client needs to produce a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub storage_address: String,
    pub bearer_token: BearerToken,
    pub storage_api: String,
}

impl ConnectionParams {
    /// Derive connection parameters. Both `set` and the reload path go through here.
    pub fn derive(info: &StorageInfo, bearer_token: &BearerToken, category: &str) -> Self {
        Self {
            storage_address: info.storage_address(category),
            bearer_token: bearer_token.clone(),
            storage_api: info.api.clone(),
        }
    }
}

/// The persisted unit: one per encoded storage name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub storage_info: StorageInfo,
    pub bearer_token: BearerToken,
}

impl Record {
    pub fn new(storage_info: StorageInfo, bearer_token: BearerToken) -> Self {
        Self {
            storage_info,
            bearer_token,
        }
    }

    pub fn connection_params(&self, category: &str) -> ConnectionParams {
        ConnectionParams::derive(&self.storage_info, &self.bearer_token, category)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| OwnpadError::Persistence(format!("cannot serialize record: {e}")))
    }

    /// Parse and validate a stored record.
    pub fn from_json(data: &str) -> Result<Self> {
        let record: Record =
            serde_json::from_str(data).map_err(|e| OwnpadError::Deserialization(e.to_string()))?;
        record.validate()?;
        Ok(record)
    }

    /// Reject records a reload could not turn back into a handle.
    pub fn validate(&self) -> Result<()> {
        if self.storage_info.template.is_empty() && self.storage_info.back_door.is_none() {
            return Err(OwnpadError::Deserialization(
                "storage template is empty".into(),
            ));
        }
        if let Some(ref back_door) = self.storage_info.back_door {
            if back_door.is_empty() {
                return Err(OwnpadError::Deserialization("backdoor is empty".into()));
            }
        }
        if self.storage_info.api.is_empty() {
            return Err(OwnpadError::Deserialization("storage api is empty".into()));
        }
        if self.bearer_token.is_empty() {
            return Err(OwnpadError::Deserialization("bearer token is empty".into()));
        }
        Ok(())
    }
}

/// Status of a live storage handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageStatus {
    Ready,
    Invalid,
}

impl fmt::Display for StorageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageStatus::Ready => write!(f, "ready"),
            StorageStatus::Invalid => write!(f, "invalid"),
        }
    }
}

/// A live connection to a storage backend, produced by a remote storage client.
#[derive(Debug, Clone)]
pub struct StorageHandle {
    pub params: ConnectionParams,
    pub status: StorageStatus,
    pub created_at: String,
    pub validated_at: Option<String>,
}

impl StorageHandle {
    pub fn new(params: ConnectionParams, status: StorageStatus, created_at: String) -> Self {
        Self {
            params,
            status,
            created_at,
            validated_at: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == StorageStatus::Ready
    }

    pub fn invalidate(&mut self) {
        self.status = StorageStatus::Invalid;
    }
}
