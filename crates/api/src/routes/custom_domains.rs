//! Custom domain cache maintenance.
//!
//! The domain-management surface calls this after verifying or disabling a
//! domain so the origin gate stops serving the stale cached decision.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::RequireTenant;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub domain: String,
    pub status: String,
    /// Whether a cached decision existed and was dropped.
    pub cache_invalidated: bool,
}

/// Drops the cached origin decision for one of the tenant's domains.
///
/// POST /api/v1/custom-domains/:domain/refresh
pub async fn refresh_custom_domain(
    State(state): State<AppState>,
    RequireTenant(tenant): RequireTenant,
    Path(domain): Path<String>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let store = state.custom_domains.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Custom domains are not configured".to_string())
    })?;

    let hostname = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    let record = store
        .find_by_domain(&hostname)
        .await?
        .filter(|record| record.account_id == tenant.account_id)
        .ok_or_else(|| ApiError::NotFound("Custom domain not found".to_string()))?;

    let cache_invalidated = state.origin_gate.domains().cache().invalidate(&hostname);
    tracing::info!(
        domain = %hostname,
        account_id = %tenant.account_id,
        status = %record.status,
        cache_invalidated,
        "Custom domain cache refreshed"
    );

    Ok(Json(RefreshResponse {
        domain: record.domain,
        status: record.status.to_string(),
        cache_invalidated,
    }))
}
