//! Tenant extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::TenantBinding;

use crate::error::ApiError;

/// The tenant bound to this request by API key or bearer token.
///
/// Handlers that operate on tenant data take this extractor; requests
/// without a bound tenant are rejected with 401.
#[derive(Debug, Clone)]
pub struct RequireTenant(pub TenantBinding);

#[async_trait]
impl<S> FromRequestParts<S> for RequireTenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantBinding>()
            .cloned()
            .map(RequireTenant)
            .ok_or_else(|| ApiError::Unauthorized("A tenant account is required".to_string()))
    }
}
