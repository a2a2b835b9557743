//! API key authentication extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::{AccountId, ApiKey};

use crate::error::ApiError;

/// Authenticated API key information.
///
/// Inserted by the API key middleware; extracting it from a request that
/// carried no valid key is rejected with 401.
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    /// Database ID of the authenticated API key.
    pub api_key_id: i64,
    /// Key prefix for identification (e.g., "gk_aBcDe").
    pub key_prefix: String,
    /// Account the key belongs to.
    pub account_id: AccountId,
}

impl From<ApiKey> for ApiKeyAuth {
    fn from(key: ApiKey) -> Self {
        Self {
            api_key_id: key.id,
            key_prefix: key.key_prefix,
            account_id: key.account_id,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ApiKeyAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ApiKeyAuth>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Invalid or missing API key".to_string()))
    }
}
