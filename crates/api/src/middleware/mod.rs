//! HTTP middleware components.
//!
//! Request pipeline, outermost first: request id, origin gate, CORS,
//! tracing, metrics, timeout, API key authentication, tenant resolution.

pub mod auth;
pub mod cors;
pub mod logging;
pub mod metrics;
pub mod tenant;
pub mod trace_id;

pub use auth::api_key_auth;
pub use cors::{cors_layer, origin_gate, OriginVerdict, API_KEY_HEADER};
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use tenant::{bearer_token, resolve_tenant};
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
