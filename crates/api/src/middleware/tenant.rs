//! Tenant resolution middleware.
//!
//! Best effort: binds the caller's account from a bearer token when no
//! earlier stage bound one. It never fails the request; handlers that need
//! a tenant reject unbound requests themselves.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use domain::models::TenantBinding;
use domain::services::{TenantResolution, TenantResolutionError, TokenError};

use crate::app::AppState;
use crate::middleware::metrics::record_tenant_resolution;

/// Middleware that resolves the tenant from `Authorization: Bearer`.
pub async fn resolve_tenant(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let existing = req.extensions().get::<TenantBinding>().cloned();
    let token = bearer_token(req.headers()).map(str::to_owned);

    let resolution = state
        .tenant_resolver
        .bind(existing.as_ref(), token.as_deref())
        .await;

    match resolution {
        TenantResolution::Resolved(binding) => {
            tracing::debug!(account_id = %binding.account_id, "Tenant resolved from bearer token");
            record_tenant_resolution(binding.source.as_str());
            req.extensions_mut().insert(binding);
        }
        TenantResolution::AlreadyBound => {
            if let Some(binding) = existing {
                record_tenant_resolution(binding.source.as_str());
            }
        }
        TenantResolution::Failed(err) => {
            log_failure(&err);
            record_tenant_resolution("unresolved");
        }
        TenantResolution::Unresolved
        | TenantResolution::MissingToken
        | TenantResolution::Disabled => {
            record_tenant_resolution("unresolved");
        }
    }

    next.run(req).await
}

fn log_failure(err: &TenantResolutionError) {
    match err {
        TenantResolutionError::Token(TokenError::Invalid(reason)) => {
            tracing::debug!(reason = %reason, "Bearer token rejected, no tenant bound");
        }
        other => {
            tracing::warn!(error = %other, "Tenant resolution failed, no tenant bound");
        }
    }
}

/// Returns the token of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively; an empty token counts as absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
