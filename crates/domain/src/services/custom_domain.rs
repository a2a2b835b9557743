//! Custom-domain origin authorization.
//!
//! Origins that fail the static allow-list may still belong to a tenant's
//! verified custom domain. Decisions are memoized in a [`DomainCache`] and
//! the store is only consulted on a miss. Any store failure, including a
//! timeout, denies the origin and caches the denial.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::allow_list::origin_hostname;
use super::domain_cache::DomainCache;
use super::within;
use crate::error::StoreError;
use crate::models::CustomDomain;

/// Read access to tenant custom-domain records.
#[async_trait]
pub trait CustomDomainStore: Send + Sync {
    /// Finds the record for `hostname` whose status is active.
    async fn find_active_by_domain(
        &self,
        hostname: &str,
    ) -> Result<Option<CustomDomain>, StoreError>;

    /// Finds the record for `hostname` in any status.
    async fn find_by_domain(&self, hostname: &str) -> Result<Option<CustomDomain>, StoreError>;
}

/// Why a custom-domain lookup produced no answer.
#[derive(Debug, Error)]
pub enum DomainLookupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Custom domain lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Outcome of a custom-domain check.
#[derive(Debug)]
pub enum DomainVerdict {
    /// No store is configured; the origin is denied without a lookup.
    Unconfigured,
    /// Answered from the cache.
    Cached(bool),
    /// Answered by the store and cached.
    Verified(bool),
    /// The store failed; the origin is denied and the denial cached.
    LookupFailed(DomainLookupError),
}

impl DomainVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, DomainVerdict::Cached(true) | DomainVerdict::Verified(true))
    }
}

/// Decides whether an origin is an active tenant custom domain.
pub struct CustomDomainAuthorizer {
    store: Option<Arc<dyn CustomDomainStore>>,
    cache: Arc<DomainCache>,
    lookup_timeout: Duration,
}

impl CustomDomainAuthorizer {
    pub fn new(
        store: Option<Arc<dyn CustomDomainStore>>,
        cache: Arc<DomainCache>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            lookup_timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub fn cache(&self) -> &Arc<DomainCache> {
        &self.cache
    }

    /// Checks `origin`, reporting how the decision was reached.
    pub async fn check(&self, origin: &str) -> DomainVerdict {
        let Some(store) = &self.store else {
            return DomainVerdict::Unconfigured;
        };

        let hostname = origin_hostname(origin);
        if let Some(allowed) = self.cache.read(&hostname) {
            return DomainVerdict::Cached(allowed);
        }

        match self.lookup(store.as_ref(), &hostname).await {
            Ok(allowed) => {
                self.cache.write(&hostname, allowed);
                DomainVerdict::Verified(allowed)
            }
            Err(err) => {
                tracing::warn!(
                    hostname = %hostname,
                    error = %err,
                    "Custom domain lookup failed, denying origin"
                );
                self.cache.write(&hostname, false);
                DomainVerdict::LookupFailed(err)
            }
        }
    }

    /// Returns `true` if `origin` is an active custom domain.
    pub async fn authorize(&self, origin: &str) -> bool {
        self.check(origin).await.is_allowed()
    }

    async fn lookup(
        &self,
        store: &dyn CustomDomainStore,
        hostname: &str,
    ) -> Result<bool, DomainLookupError> {
        let record = within(self.lookup_timeout, store.find_active_by_domain(hostname))
            .await
            .ok_or(DomainLookupError::Timeout(self.lookup_timeout))??;

        Ok(record.is_some_and(|domain| domain.is_active()))
    }
}
