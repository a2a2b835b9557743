use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use domain::services::{
    AllowList, ApiKeyAuthenticator, ApiKeyStore, Clock, CustomDomainAuthorizer,
    CustomDomainStore, DomainCache, MembershipStore, OriginGate, SystemClock, TenantResolver,
    TokenVerifier,
};
use persistence::repositories::{AccountMemberRepository, ApiKeyRepository, CustomDomainRepository};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::{
    api_key_auth, cors_layer, metrics_handler, metrics_middleware, origin_gate, resolve_tenant,
    trace_id,
};
use crate::routes::{custom_domains, health, tenant};
use crate::services::{build_token_verifier, IdentityError};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` in degraded mode.
    pub pool: Option<PgPool>,
    pub origin_gate: Arc<OriginGate>,
    pub tenant_resolver: Arc<TenantResolver>,
    pub api_keys: Option<ApiKeyAuthenticator>,
    pub custom_domains: Option<Arc<dyn CustomDomainStore>>,
}

/// External collaborators the gate consults.
///
/// Any collaborator left `None` switches its component to degraded mode.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub custom_domains: Option<Arc<dyn CustomDomainStore>>,
    pub memberships: Option<Arc<dyn MembershipStore>>,
    pub api_keys: Option<Arc<dyn ApiKeyStore>>,
    pub token_verifier: Option<Arc<dyn TokenVerifier>>,
    /// Clock for the custom-domain cache; the system clock when `None`.
    pub clock: Option<Arc<dyn Clock>>,
}

impl Collaborators {
    /// PostgreSQL-backed stores plus the configured identity provider.
    pub fn from_config(config: &Config, pool: Option<&PgPool>) -> Result<Self, IdentityError> {
        let mut collaborators = Self {
            token_verifier: build_token_verifier(&config.identity)?,
            ..Self::default()
        };

        if let Some(pool) = pool {
            collaborators.custom_domains = Some(Arc::new(CustomDomainRepository::new(pool.clone())));
            collaborators.memberships = Some(Arc::new(AccountMemberRepository::new(pool.clone())));
            collaborators.api_keys = Some(Arc::new(ApiKeyRepository::new(pool.clone())));
        }

        Ok(collaborators)
    }
}

/// Builds the application with PostgreSQL-backed collaborators.
pub fn create_app(config: Config, pool: Option<PgPool>) -> Result<Router, IdentityError> {
    let collaborators = Collaborators::from_config(&config, pool.as_ref())?;
    Ok(create_app_with(config, pool, collaborators))
}

/// Builds the application around the given collaborators.
pub fn create_app_with(config: Config, pool: Option<PgPool>, collaborators: Collaborators) -> Router {
    let config = Arc::new(config);
    let state = build_state(config.clone(), pool, collaborators);

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    let tenant_routes = Router::new()
        .route("/api/v1/tenant", get(tenant::current_tenant))
        .route(
            "/api/v1/custom-domains/:domain/refresh",
            post(custom_domains::refresh_custom_domain),
        );

    Router::new()
        .merge(public_routes)
        .merge(tenant_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(state.clone(), resolve_tenant))
        .layer(middleware::from_fn_with_state(state.clone(), api_key_auth))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(middleware::from_fn_with_state(state.clone(), origin_gate))
        .layer(middleware::from_fn(trace_id))
        .with_state(state)
}

fn build_state(config: Arc<Config>, pool: Option<PgPool>, collaborators: Collaborators) -> AppState {
    let domains_config = &config.custom_domains;
    let clock = collaborators
        .clock
        .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
    let cache = Arc::new(DomainCache::with_clock(
        domains_config.cache_ttl(),
        domains_config.cache_capacity,
        clock,
    ));

    let allow_list = AllowList::new(&config.cors.allowed_origins);
    let authorizer = CustomDomainAuthorizer::new(
        collaborators.custom_domains.clone(),
        cache,
        domains_config.lookup_timeout(),
    );

    let tenant_resolver = TenantResolver::new(
        collaborators.token_verifier,
        collaborators.memberships,
        config.identity.timeout(),
    );

    if collaborators.custom_domains.is_none() {
        tracing::warn!("No custom domain store configured: CORS falls back to the allow-list only");
    }
    if !tenant_resolver.is_enabled() {
        tracing::warn!(
            "Tenant resolution disabled: identity provider or membership store not configured"
        );
    }
    if allow_list.entries().is_empty() {
        tracing::warn!("CORS allow-list is empty: only same-origin and custom domains are allowed");
    }

    AppState {
        config,
        pool,
        origin_gate: Arc::new(OriginGate::new(allow_list, authorizer)),
        tenant_resolver: Arc::new(tenant_resolver),
        api_keys: collaborators.api_keys.map(ApiKeyAuthenticator::new),
        custom_domains: collaborators.custom_domains,
    }
}
