//! Gate services.
//!
//! Each service depends on its external collaborators only through the
//! traits declared next to it, so every decision can be exercised with
//! in-memory stubs.

pub mod allow_list;
pub mod api_key;
pub mod custom_domain;
pub mod domain_cache;
pub mod origin_gate;
pub mod tenant_resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use allow_list::{origin_hostname, AllowList};
pub use api_key::{ApiKeyAuthenticator, ApiKeyError, ApiKeyStore};
pub use custom_domain::{CustomDomainAuthorizer, CustomDomainStore, DomainLookupError, DomainVerdict};
pub use domain_cache::{Clock, DomainCache, ManualClock, SystemClock};
pub use origin_gate::{OriginDecision, OriginGate};
pub use tenant_resolver::{
    MembershipStore, TenantResolution, TenantResolutionError, TenantResolver, TokenError,
    TokenVerifier,
};

use std::future::Future;
use std::time::Duration;

/// Awaits `fut` for at most `limit`. A zero limit waits indefinitely.
///
/// Returns `None` when the limit elapsed first.
pub(crate) async fn within<F: Future>(limit: Duration, fut: F) -> Option<F::Output> {
    if limit.is_zero() {
        Some(fut.await)
    } else {
        tokio::time::timeout(limit, fut).await.ok()
    }
}
