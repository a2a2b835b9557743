//! API-key authentication.
//!
//! Keys are stored as SHA-256 digests. A valid key binds the account that
//! owns it; this takes precedence over bearer-token resolution.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;

use crate::error::StoreError;
use crate::models::ApiKey;
use shared::crypto::{is_well_formed_api_key, sha256_hex};

/// Read/write access to stored API keys.
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Finds a key by the hex SHA-256 digest of its secret.
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, StoreError>;

    /// Records that the key was just used.
    async fn touch_last_used(&self, key_id: i64) -> Result<(), StoreError>;
}

/// Why an API key was rejected.
#[derive(Debug, Error)]
pub enum ApiKeyError {
    #[error("Malformed API key")]
    Malformed,

    #[error("Unknown API key")]
    Unknown,

    #[error("API key is inactive")]
    Inactive,

    #[error("API key has expired")]
    Expired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates raw API keys against the store.
#[derive(Clone)]
pub struct ApiKeyAuthenticator {
    store: Arc<dyn ApiKeyStore>,
}

impl ApiKeyAuthenticator {
    pub fn new(store: Arc<dyn ApiKeyStore>) -> Self {
        Self { store }
    }

    /// Authenticates `raw_key`, returning the stored key on success.
    ///
    /// On success `last_used_at` is updated in the background.
    pub async fn authenticate(&self, raw_key: &str) -> Result<ApiKey, ApiKeyError> {
        if !is_well_formed_api_key(raw_key) {
            return Err(ApiKeyError::Malformed);
        }

        let key = self
            .store
            .find_by_key_hash(&sha256_hex(raw_key))
            .await?
            .ok_or(ApiKeyError::Unknown)?;

        let now = Utc::now();
        if !key.is_active {
            return Err(ApiKeyError::Inactive);
        }
        if key.is_expired_at(now) {
            return Err(ApiKeyError::Expired);
        }

        // Fire and forget
        let store = self.store.clone();
        let key_id = key.id;
        tokio::spawn(async move {
            if let Err(e) = store.touch_last_used(key_id).await {
                tracing::warn!("Failed to update API key last_used_at: {}", e);
            }
        });

        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::StubApiKeys;
    use chrono::Duration;

    const RAW_KEY: &str = "gk_aBcDeFgH12345";

    fn key(is_active: bool, expires_in_days: Option<i64>) -> ApiKey {
        ApiKey {
            id: 7,
            account_id: "acct_api".into(),
            key_prefix: "aBcDeFgH".to_string(),
            is_active,
            expires_at: expires_in_days.map(|d| Utc::now() + Duration::days(d)),
        }
    }

    #[tokio::test]
    async fn test_valid_key() {
        let store = Arc::new(StubApiKeys::default().with_key(RAW_KEY, key(true, None)));
        let auth = ApiKeyAuthenticator::new(store);

        let key = auth.authenticate(RAW_KEY).await.unwrap();
        assert_eq!(key.account_id.as_str(), "acct_api");
    }

    #[tokio::test]
    async fn test_malformed_key_skips_store() {
        let auth = ApiKeyAuthenticator::new(Arc::new(StubApiKeys::failing()));
        assert!(matches!(
            auth.authenticate("pm_aBcDeFgH12345").await,
            Err(ApiKeyError::Malformed)
        ));
        assert!(matches!(
            auth.authenticate("gk_short").await,
            Err(ApiKeyError::Malformed)
        ));
    }

    #[tokio::test]
    async fn test_unknown_key() {
        let auth = ApiKeyAuthenticator::new(Arc::new(StubApiKeys::default()));
        assert!(matches!(
            auth.authenticate(RAW_KEY).await,
            Err(ApiKeyError::Unknown)
        ));
    }

    #[tokio::test]
    async fn test_inactive_key() {
        let store = Arc::new(StubApiKeys::default().with_key(RAW_KEY, key(false, None)));
        let auth = ApiKeyAuthenticator::new(store);
        assert!(matches!(
            auth.authenticate(RAW_KEY).await,
            Err(ApiKeyError::Inactive)
        ));
    }

    #[tokio::test]
    async fn test_expired_key() {
        let store = Arc::new(StubApiKeys::default().with_key(RAW_KEY, key(true, Some(-1))));
        let auth = ApiKeyAuthenticator::new(store);
        assert!(matches!(
            auth.authenticate(RAW_KEY).await,
            Err(ApiKeyError::Expired)
        ));
    }

    #[tokio::test]
    async fn test_store_failure() {
        let auth = ApiKeyAuthenticator::new(Arc::new(StubApiKeys::failing()));
        assert!(matches!(
            auth.authenticate(RAW_KEY).await,
            Err(ApiKeyError::Store(_))
        ));
    }
}
