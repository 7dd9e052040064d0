use async_trait::async_trait;
use ownpad_core::config::OwnpadSettings;
use ownpad_core::{
    BearerToken, CATEGORY_PLACEHOLDER, ConnectionParams, OwnpadError, Result, StorageHandle,
    StorageStatus,
};
use subtle::ConstantTimeEq;

use crate::provider::RemoteStorage;

/// Remote storage client that checks parameters and verifies bearer tokens
/// locally, without talking to the backend.
///
/// A handle is accepted when its address is an absolute `http`/`https` URI
/// and it carries an API tag and a token. Tokens are compared in constant time.
#[derive(Debug, Default)]
pub struct BearerRemoteStorage {
    supported_apis: Option<Vec<String>>,
}

impl BearerRemoteStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept storages speaking one of `apis`.
    pub fn with_supported_apis<I, S>(apis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            supported_apis: Some(apis.into_iter().map(Into::into).collect()),
        }
    }

    /// Build the client from `ownpad.supported_apis`.
    pub fn from_settings(settings: &OwnpadSettings) -> Self {
        match settings.supported_apis {
            Some(ref apis) => Self::with_supported_apis(apis.iter().cloned()),
            None => Self::new(),
        }
    }

    fn check_params(&self, params: &ConnectionParams) -> std::result::Result<(), String> {
        if params.storage_address.contains(CATEGORY_PLACEHOLDER) {
            return Err(format!(
                "storage address `{}` still holds a template placeholder",
                params.storage_address
            ));
        }
        let uri: http::Uri = params
            .storage_address
            .parse()
            .map_err(|e| format!("invalid storage address `{}`: {e}", params.storage_address))?;
        match uri.scheme_str() {
            Some("http") | Some("https") => {}
            _ => {
                return Err(format!(
                    "storage address `{}` is not http(s)",
                    params.storage_address
                ));
            }
        }
        if uri.authority().is_none() {
            return Err(format!(
                "storage address `{}` has no host",
                params.storage_address
            ));
        }

        if params.storage_api.is_empty() {
            return Err("storage api is empty".into());
        }
        if let Some(ref apis) = self.supported_apis {
            if !apis.iter().any(|a| a == &params.storage_api) {
                return Err(format!("unsupported storage api `{}`", params.storage_api));
            }
        }

        if params.bearer_token.is_empty() {
            return Err("bearer token is empty".into());
        }
        Ok(())
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[async_trait]
impl RemoteStorage for BearerRemoteStorage {
    async fn init(&self, params: &ConnectionParams) -> Result<StorageHandle> {
        let handle = StorageHandle::new(params.clone(), StorageStatus::Ready, now());
        if let Err(reason) = self.check_params(params) {
            tracing::warn!(address = %params.storage_address, "Rejected storage: {reason}");
            return Err(OwnpadError::remote_init(reason, handle));
        }
        Ok(handle)
    }

    async fn validate(
        &self,
        handle: Option<&StorageHandle>,
        token: &BearerToken,
    ) -> Result<StorageHandle> {
        let handle =
            handle.ok_or_else(|| OwnpadError::Validation("no storage initialized".into()))?;
        if !handle.is_ready() {
            return Err(OwnpadError::Validation(format!(
                "storage is {}",
                handle.status
            )));
        }

        let expected = handle.params.bearer_token.as_str().as_bytes();
        if !bool::from(expected.ct_eq(token.as_str().as_bytes())) {
            return Err(OwnpadError::Validation("bearer token mismatch".into()));
        }

        let mut validated = handle.clone();
        validated.validated_at = Some(now());
        Ok(validated)
    }

    fn name(&self) -> &str {
        "bearer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ownpad_core::config::OwnpadConfig;
    use ownpad_core::{DEFAULT_CATEGORY, StorageInfo};
    use std::path::Path;

    fn params(address: &str, token: &str) -> ConnectionParams {
        ConnectionParams {
            storage_address: address.to_string(),
            bearer_token: BearerToken::new(token),
            storage_api: "simple".to_string(),
        }
    }

    #[tokio::test]
    async fn init_accepts_https_address() {
        let info = StorageInfo::new("https://example.org/storage/bob/{category}", "simple");
        let p = ConnectionParams::derive(&info, &"tok".into(), DEFAULT_CATEGORY);
        let handle = BearerRemoteStorage::new().init(&p).await.unwrap();
        assert!(handle.is_ready());
        assert_eq!(handle.params, p);
        assert!(handle.validated_at.is_none());
    }

    #[tokio::test]
    async fn init_rejects_relative_address() {
        let err = BearerRemoteStorage::new()
            .init(&params("/storage/bob", "tok"))
            .await
            .unwrap_err();
        let handle = err.failed_handle().expect("handle carried by error");
        assert_eq!(handle.status, StorageStatus::Invalid);
    }

    #[tokio::test]
    async fn init_rejects_unfilled_template() {
        let result = BearerRemoteStorage::new()
            .init(&params("https://example.org/{category}", "tok"))
            .await;
        assert!(matches!(result, Err(OwnpadError::RemoteInit { .. })));
    }

    #[tokio::test]
    async fn init_rejects_empty_token() {
        let result = BearerRemoteStorage::new()
            .init(&params("https://example.org/s", ""))
            .await;
        assert!(matches!(result, Err(OwnpadError::RemoteInit { .. })));
    }

    #[tokio::test]
    async fn init_enforces_supported_apis() {
        let remote = BearerRemoteStorage::with_supported_apis(["WebDAV", "CouchDB"]);
        let result = remote.init(&params("https://example.org/s", "tok")).await;
        assert!(matches!(result, Err(OwnpadError::RemoteInit { ref reason, .. }) if reason.contains("simple")));
    }

    #[tokio::test]
    async fn settings_restrict_apis() {
        let mut settings = OwnpadConfig::default_config(Path::new("/tmp")).ownpad;
        let open = BearerRemoteStorage::from_settings(&settings);
        assert!(open.init(&params("https://example.org/s", "tok")).await.is_ok());

        settings.supported_apis = Some(vec!["CouchDB".into()]);
        let restricted = BearerRemoteStorage::from_settings(&settings);
        let result = restricted.init(&params("https://example.org/s", "tok")).await;
        assert!(matches!(result, Err(OwnpadError::RemoteInit { .. })));
    }

    #[tokio::test]
    async fn validate_matching_token() {
        let remote = BearerRemoteStorage::new();
        let handle = remote.init(&params("https://example.org/s", "tok")).await.unwrap();
        let validated = remote
            .validate(Some(&handle), &BearerToken::new("tok"))
            .await
            .unwrap();
        assert!(validated.validated_at.is_some());
        assert_eq!(validated.params, handle.params);
    }

    #[tokio::test]
    async fn validate_rejects_wrong_token() {
        let remote = BearerRemoteStorage::new();
        let handle = remote.init(&params("https://example.org/s", "tok")).await.unwrap();
        for wrong in ["tok2", "to", ""] {
            let result = remote.validate(Some(&handle), &BearerToken::new(wrong)).await;
            assert!(matches!(result, Err(OwnpadError::Validation(_))), "{wrong}");
        }
    }

    #[tokio::test]
    async fn validate_without_handle_fails() {
        let result = BearerRemoteStorage::new()
            .validate(None, &BearerToken::new("tok"))
            .await;
        assert!(matches!(result, Err(OwnpadError::Validation(_))));
    }

    #[tokio::test]
    async fn validate_invalid_handle_fails() {
        let remote = BearerRemoteStorage::new();
        let mut handle = remote.init(&params("https://example.org/s", "tok")).await.unwrap();
        handle.invalidate();
        let result = remote.validate(Some(&handle), &BearerToken::new("tok")).await;
        assert!(matches!(result, Err(OwnpadError::Validation(ref m)) if m.contains("invalid")));
    }
}
