//! Tenant binding models.

use serde::{Deserialize, Serialize};

/// Identifier of a tenant account.
///
/// Kept opaque: the gate never interprets it, it only attaches it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which pipeline stage bound the tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantSource {
    ApiKey,
    BearerToken,
}

impl TenantSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantSource::ApiKey => "api_key",
            TenantSource::BearerToken => "bearer_token",
        }
    }
}

impl std::fmt::Display for TenantSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tenant attached to a request's processing context.
///
/// At most one binding exists per request. The first stage to produce one
/// wins; later stages never overwrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantBinding {
    pub account_id: AccountId,
    pub source: TenantSource,
}

impl TenantBinding {
    pub fn from_api_key(account_id: AccountId) -> Self {
        Self {
            account_id,
            source: TenantSource::ApiKey,
        }
    }

    pub fn from_bearer_token(account_id: AccountId) -> Self {
        Self {
            account_id,
            source: TenantSource::BearerToken,
        }
    }
}
