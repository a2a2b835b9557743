//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;

use crate::app::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
    pub gate: GateHealth,
}

/// Database health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseHealth {
    /// False in degraded mode.
    pub configured: bool,
    pub connected: bool,
    pub latency_ms: Option<u64>,
}

/// Which gate components are active.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GateHealth {
    pub allow_list_entries: usize,
    pub custom_domains_enabled: bool,
    pub cached_domains: usize,
    pub tenant_resolution_enabled: bool,
    pub api_keys_enabled: bool,
}

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

async fn ping(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// Full health check endpoint.
///
/// Reports database connectivity and which gate components run in
/// degraded mode. Returns 503 only when a configured database is
/// unreachable.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let (connected, latency_ms) = match &state.pool {
        Some(pool) => {
            let start = Instant::now();
            let connected = ping(pool).await;
            let latency_ms = start.elapsed().as_millis() as u64;
            (connected, connected.then_some(latency_ms))
        }
        None => (false, None),
    };
    let configured = state.pool.is_some();
    let domains = state.origin_gate.domains();

    let healthy = !configured || connected;
    let status = match (configured, healthy) {
        (false, _) => "degraded",
        (true, true) => "healthy",
        (true, false) => "unhealthy",
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: DatabaseHealth {
            configured,
            connected,
            latency_ms,
        },
        gate: GateHealth {
            allow_list_entries: state.origin_gate.allow_list().entries().len(),
            custom_domains_enabled: domains.is_configured(),
            cached_domains: domains.cache().len(),
            tenant_resolution_enabled: state.tenant_resolver.is_enabled(),
            api_keys_enabled: state.api_keys.is_some(),
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Ready when the database is either unconfigured or reachable.
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    let ready = match &state.pool {
        Some(pool) => ping(pool).await,
        None => true,
    };

    if ready {
        Ok(Json(StatusResponse {
            status: "ready".to_string(),
        }))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
