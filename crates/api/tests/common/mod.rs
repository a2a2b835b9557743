//! Common test utilities for integration tests.
//!
//! Builds the real router around in-memory collaborators, so no database
//! or identity provider is needed.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use domain::models::{
    AccountId, ApiKey, CustomDomain, CustomDomainStatus, Membership, MembershipStatus,
};
use domain::services::{
    ApiKeyStore, Clock, CustomDomainStore, ManualClock, MembershipStore, TokenError,
    TokenVerifier,
};
use domain::StoreError;
use grooming_api::{
    app::{create_app_with, Collaborators},
    config::Config,
};
use serde_json::Value;
use shared::crypto::sha256_hex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Custom domain rows keyed by hostname.
#[derive(Default)]
pub struct StubDomains {
    rows: RwLock<HashMap<String, CustomDomain>>,
    failing: bool,
    pub calls: AtomicUsize,
}

impl StubDomains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with(self, account_id: &str, domain: &str, status: CustomDomainStatus) -> Self {
        self.upsert(account_id, domain, status);
        self
    }

    pub fn upsert(&self, account_id: &str, domain: &str, status: CustomDomainStatus) {
        let now = Utc::now();
        self.rows.write().unwrap().insert(
            domain.to_string(),
            CustomDomain {
                id: Uuid::new_v4(),
                account_id: account_id.into(),
                domain: domain.to_string(),
                status,
                created_at: now,
                updated_at: now,
            },
        );
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CustomDomainStore for StubDomains {
    async fn find_active_by_domain(
        &self,
        hostname: &str,
    ) -> Result<Option<CustomDomain>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(self
            .rows
            .read()
            .unwrap()
            .get(hostname)
            .filter(|row| row.is_active())
            .cloned())
    }

    async fn find_by_domain(&self, hostname: &str) -> Result<Option<CustomDomain>, StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(self.rows.read().unwrap().get(hostname).cloned())
    }
}

/// Maps opaque bearer tokens to user ids.
#[derive(Default)]
pub struct StubTokens {
    users: HashMap<String, Uuid>,
    pub calls: AtomicUsize,
}

impl StubTokens {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn with(mut self, token: &str, user_id: Uuid) -> Self {
        self.users.insert(token.to_string(), user_id);
        self
    }
}

#[async_trait]
impl TokenVerifier for StubTokens {
    async fn verify(&self, token: &str) -> Result<Option<Uuid>, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.users
            .get(token)
            .copied()
            .map(Some)
            .ok_or_else(|| TokenError::Invalid("unknown token".into()))
    }
}

/// Membership rows.
#[derive(Default)]
pub struct StubMemberships {
    rows: Vec<Membership>,
}

impl StubMemberships {
    pub fn with(
        mut self,
        user_id: Uuid,
        account_id: &str,
        status: MembershipStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.rows.push(Membership {
            account_id: account_id.into(),
            user_id,
            role: "staff".to_string(),
            status,
            created_at,
        });
        self
    }
}

#[async_trait]
impl MembershipStore for StubMemberships {
    async fn accepted_memberships(&self, user_id: Uuid) -> Result<Vec<Membership>, StoreError> {
        let mut rows: Vec<Membership> = self
            .rows
            .iter()
            .filter(|m| m.user_id == user_id && m.status == MembershipStatus::Accepted)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.created_at);
        Ok(rows)
    }
}

/// API keys keyed by the hash of the raw key.
#[derive(Default)]
pub struct StubApiKeys {
    keys: HashMap<String, ApiKey>,
    failing: bool,
}

impl StubApiKeys {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with(self, raw_key: &str, account_id: &str) -> Self {
        self.with_key(raw_key, account_id, true, None)
    }

    pub fn with_key(
        mut self,
        raw_key: &str,
        account_id: &str,
        is_active: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        let id = self.keys.len() as i64 + 1;
        self.keys.insert(
            sha256_hex(raw_key),
            ApiKey {
                id,
                account_id: AccountId::new(account_id),
                key_prefix: raw_key.chars().take(8).collect(),
                is_active,
                expires_at,
            },
        );
        self
    }
}

#[async_trait]
impl ApiKeyStore for StubApiKeys {
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, StoreError> {
        if self.failing {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(self.keys.get(key_hash).cloned())
    }

    async fn touch_last_used(&self, _key_id: i64) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Collaborators for one test, with handles kept for assertions.
pub struct TestGate {
    pub domains: Arc<StubDomains>,
    pub clock: Arc<ManualClock>,
    pub collaborators: Collaborators,
}

impl TestGate {
    pub fn new(domains: StubDomains) -> Self {
        let domains = Arc::new(domains);
        let clock = Arc::new(ManualClock::new());
        let collaborators = Collaborators {
            custom_domains: Some(domains.clone() as Arc<dyn CustomDomainStore>),
            clock: Some(clock.clone() as Arc<dyn Clock>),
            ..Collaborators::default()
        };

        Self {
            domains,
            clock,
            collaborators,
        }
    }

    pub fn with_tenants(mut self, tokens: Arc<StubTokens>, memberships: StubMemberships) -> Self {
        self.collaborators.token_verifier = Some(tokens as Arc<dyn TokenVerifier>);
        self.collaborators.memberships = Some(Arc::new(memberships));
        self
    }

    pub fn with_api_keys(mut self, keys: StubApiKeys) -> Self {
        self.collaborators.api_keys = Some(Arc::new(keys));
        self
    }

    pub fn app(&self, allowed_origins: &str) -> Router {
        create_app_with(test_config(allowed_origins), None, self.collaborators.clone())
    }
}

/// Test configuration with the given comma separated allow-list.
pub fn test_config(allowed_origins: &str) -> Config {
    let mut config = Config::with_overrides(&[
        ("server.host", "127.0.0.1"),
        ("custom_domains.cache_ttl_secs", "300"),
    ])
    .expect("Failed to load test config");
    config.cors.allowed_origins = grooming_api::config::split_origins(allowed_origins);
    config
}

/// A GET request carrying an `Origin` header.
pub fn get_with_origin(uri: &str, origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap()
}

/// A request with optional bearer token and API key headers.
pub fn authed_request(
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    api_key: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::empty()).unwrap()
}

/// The `Access-Control-Allow-Origin` value of a response, if any.
pub fn allowed_origin(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap().to_string())
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - ChronoDuration::days(days)
}
