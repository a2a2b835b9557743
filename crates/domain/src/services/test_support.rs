//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use super::api_key::ApiKeyStore;
use super::custom_domain::CustomDomainStore;
use super::tenant_resolver::{MembershipStore, TokenError, TokenVerifier};
use crate::error::StoreError;
use crate::models::{ApiKey, CustomDomain, CustomDomainStatus, Membership, MembershipStatus};

/// Custom-domain store that counts every query.
pub struct StubDomainStore {
    domains: HashMap<String, CustomDomainStatus>,
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_hostname: Mutex<Option<String>>,
}

impl StubDomainStore {
    pub fn empty() -> Self {
        Self {
            domains: HashMap::new(),
            fail: false,
            delay: None,
            calls: AtomicUsize::new(0),
            last_hostname: Mutex::new(None),
        }
    }

    pub fn with_active<I, S>(hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::empty();
        for hostname in hostnames {
            store
                .domains
                .insert(hostname.into(), CustomDomainStatus::Active);
        }
        store
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::empty()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_hostname(&self) -> Option<String> {
        self.last_hostname.lock().unwrap().clone()
    }

    fn record(hostname: &str, status: CustomDomainStatus) -> CustomDomain {
        CustomDomain {
            id: Uuid::new_v4(),
            account_id: "acct_domain_owner".into(),
            domain: hostname.to_string(),
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[async_trait]
impl CustomDomainStore for StubDomainStore {
    async fn find_active_by_domain(
        &self,
        hostname: &str,
    ) -> Result<Option<CustomDomain>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_hostname.lock().unwrap() = Some(hostname.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(self
            .domains
            .get(hostname)
            .filter(|status| **status == CustomDomainStatus::Active)
            .map(|status| Self::record(hostname, *status)))
    }

    async fn find_by_domain(&self, hostname: &str) -> Result<Option<CustomDomain>, StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(self
            .domains
            .get(hostname)
            .map(|status| Self::record(hostname, *status)))
    }
}

/// Token verifier backed by a fixed token -> user table.
#[derive(Default)]
pub struct StubVerifier {
    users: HashMap<String, Option<Uuid>>,
    fail: bool,
    delay: Option<Duration>,
    pub calls: AtomicUsize,
}

impl StubVerifier {
    pub fn with_token(mut self, token: &str, user_id: Uuid) -> Self {
        self.users.insert(token.to_string(), Some(user_id));
        self
    }

    pub fn with_anonymous_token(mut self, token: &str) -> Self {
        self.users.insert(token.to_string(), None);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl TokenVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<Option<Uuid>, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(TokenError::Provider("identity provider down".to_string()));
        }
        self.users
            .get(token)
            .copied()
            .ok_or_else(|| TokenError::Invalid("unknown token".to_string()))
    }
}

/// Membership store backed by an in-memory list.
#[derive(Default)]
pub struct StubMemberships {
    memberships: Vec<Membership>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl StubMemberships {
    pub fn with(mut self, user_id: Uuid, account_id: &str, created_at: DateTime<Utc>) -> Self {
        self.memberships.push(Membership {
            account_id: account_id.into(),
            user_id,
            role: "member".to_string(),
            status: MembershipStatus::Accepted,
            created_at,
        });
        self
    }

    pub fn with_status(
        mut self,
        user_id: Uuid,
        account_id: &str,
        status: MembershipStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        self.memberships.push(Membership {
            account_id: account_id.into(),
            user_id,
            role: "member".to_string(),
            status,
            created_at,
        });
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl MembershipStore for StubMemberships {
    async fn accepted_memberships(&self, user_id: Uuid) -> Result<Vec<Membership>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StoreError::Query("relation does not exist".to_string()));
        }
        Ok(self
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id && m.status == MembershipStatus::Accepted)
            .cloned()
            .collect())
    }
}

/// API key store keyed by key hash.
#[derive(Default)]
pub struct StubApiKeys {
    keys: HashMap<String, ApiKey>,
    fail: bool,
    pub touched: AtomicUsize,
}

impl StubApiKeys {
    pub fn with_key(mut self, raw_key: &str, key: ApiKey) -> Self {
        self.keys.insert(shared::crypto::sha256_hex(raw_key), key);
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ApiKeyStore for StubApiKeys {
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable("pool timed out".to_string()));
        }
        Ok(self.keys.get(key_hash).cloned())
    }

    async fn touch_last_used(&self, _key_id: i64) -> Result<(), StoreError> {
        self.touched.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
