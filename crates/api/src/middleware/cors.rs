//! Origin gate and CORS policy.
//!
//! The origin decision may need a database round-trip, while the CORS
//! layer's origin predicate is synchronous. [`origin_gate`] therefore runs
//! first, evaluates the `Origin` header and leaves an [`OriginVerdict`] in
//! the request extensions; the predicate installed by [`cors_layer`] only
//! reads that verdict.

use axum::{
    body::Body,
    extract::State,
    http::{header, request::Parts, HeaderName, HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
};
use domain::services::origin_hostname;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::app::AppState;
use crate::middleware::metrics::record_origin_decision;

/// Header carrying a tenant API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Whether the request's origin may receive CORS headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginVerdict {
    pub allowed: bool,
}

/// Middleware that decides whether the request's `Origin` is permitted.
///
/// A denied origin does not stop the request: the CORS layer simply omits
/// the `Access-Control-Allow-*` headers and the browser blocks the response.
pub async fn origin_gate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned());

    let decision = state.origin_gate.evaluate(origin.as_deref()).await;
    let allowed = decision.is_allowed();
    record_origin_decision(decision.outcome());

    if !allowed {
        let origin = origin.unwrap_or_default();
        tracing::warn!(
            origin = %origin,
            hostname = %origin_hostname(&origin),
            reason = decision.outcome(),
            "Origin rejected by CORS policy"
        );
    }

    req.extensions_mut().insert(OriginVerdict { allowed });
    next.run(req).await
}

/// Builds the CORS layer that honours the [`OriginVerdict`].
///
/// Requests that never passed through [`origin_gate`] are treated as denied.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |_origin: &HeaderValue, parts: &Parts| {
                parts
                    .extensions
                    .get::<OriginVerdict>()
                    .is_some_and(|verdict| verdict.allowed)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .allow_credentials(true)
}
