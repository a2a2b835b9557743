//! API key authentication middleware.
//!
//! Runs before tenant resolution. A valid key binds the key's account as
//! the request's tenant, which bearer-token resolution never overrides.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::TenantBinding;
use domain::services::ApiKeyError;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::api_key::ApiKeyAuth;
use crate::middleware::cors::API_KEY_HEADER;

/// Middleware that authenticates the `x-api-key` header when present.
///
/// Requests without the header pass through untouched. A header that does
/// not authenticate is rejected with 401; a key store failure with 503.
pub async fn api_key_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(raw_key) = req.headers().get(API_KEY_HEADER) else {
        return next.run(req).await;
    };
    let raw_key = raw_key.to_str().unwrap_or_default().trim().to_string();

    let Some(authenticator) = &state.api_keys else {
        tracing::warn!("API key presented but no key store is configured");
        return unavailable().into_response();
    };

    match authenticator.authenticate(&raw_key).await {
        Ok(key) => {
            tracing::debug!(
                key_prefix = %key.key_prefix,
                account_id = %key.account_id,
                "API key authenticated"
            );
            req.extensions_mut()
                .insert(TenantBinding::from_api_key(key.account_id.clone()));
            req.extensions_mut().insert(ApiKeyAuth::from(key));
            next.run(req).await
        }
        Err(err) => rejection(err).into_response(),
    }
}

fn rejection(err: ApiKeyError) -> ApiError {
    match err {
        ApiKeyError::Store(store_err) => {
            tracing::error!(error = %store_err, "Database error during API key lookup");
            unavailable()
        }
        ApiKeyError::Expired => ApiError::Unauthorized("API key has expired".to_string()),
        ApiKeyError::Malformed | ApiKeyError::Unknown | ApiKeyError::Inactive => {
            ApiError::Unauthorized("Invalid or missing API key".to_string())
        }
    }
}

fn unavailable() -> ApiError {
    ApiError::ServiceUnavailable("Authentication service unavailable".to_string())
}
