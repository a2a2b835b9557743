//! Tenant introspection endpoint.

use axum::Json;
use serde::Serialize;

use crate::extractors::{ApiKeyAuth, RequireTenant};

#[derive(Debug, Serialize)]
pub struct TenantResponse {
    pub account_id: String,
    /// `api_key` or `bearer_token`
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_prefix: Option<String>,
}

/// Returns the tenant bound to the current request.
///
/// GET /api/v1/tenant
pub async fn current_tenant(
    RequireTenant(binding): RequireTenant,
    api_key: Option<ApiKeyAuth>,
) -> Json<TenantResponse> {
    Json(TenantResponse {
        account_id: binding.account_id.to_string(),
        source: binding.source.as_str(),
        api_key_prefix: api_key.map(|auth| auth.key_prefix),
    })
}
