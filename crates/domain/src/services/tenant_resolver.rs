//! Bearer-token tenant resolution.
//!
//! Runs after API-key authentication. When no tenant is bound yet, the
//! bearer token is verified against the identity provider and the caller's
//! oldest accepted membership selects the account. Resolution is best
//! effort: every failure leaves the request without a tenant and route
//! handlers decide whether that is acceptable.
//!
//! ```text
//! START -> already bound?  -> AlreadyBound
//!       -> disabled?       -> Disabled
//!       -> token present?  -- no  --> MissingToken
//!       -> token valid?    -- no  --> Failed
//!       -> membership?     -- no  --> Unresolved
//!                          -- yes --> Resolved
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use super::within;
use crate::error::StoreError;
use crate::models::{AccountId, Membership, MembershipStatus, TenantBinding};

/// Why a bearer token did not yield a user.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Identity provider unavailable: {0}")]
    Provider(String),
}

/// Verifies bearer tokens against the identity provider.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Returns the user the token was issued to, or `None` if the provider
    /// accepted the token without naming a user.
    async fn verify(&self, token: &str) -> Result<Option<Uuid>, TokenError>;
}

/// Read access to account memberships.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Returns the user's accepted memberships, oldest first.
    async fn accepted_memberships(&self, user_id: Uuid) -> Result<Vec<Membership>, StoreError>;
}

/// Why tenant resolution produced no answer.
#[derive(Debug, Error)]
pub enum TenantResolutionError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Membership lookup failed: {0}")]
    Store(#[from] StoreError),

    #[error("Tenant resolution timed out after {0:?}")]
    Timeout(Duration),
}

/// Terminal state reached for one request.
#[derive(Debug)]
pub enum TenantResolution {
    /// A higher-priority stage already bound a tenant; left untouched.
    AlreadyBound,
    /// No identity provider or membership store is configured.
    Disabled,
    /// No bearer token on the request.
    MissingToken,
    /// Valid caller, but no accepted membership.
    Unresolved,
    /// Token verification or membership lookup failed.
    Failed(TenantResolutionError),
    /// A tenant was bound from the bearer token.
    Resolved(TenantBinding),
}

impl TenantResolution {
    pub fn binding(&self) -> Option<&TenantBinding> {
        match self {
            TenantResolution::Resolved(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn into_binding(self) -> Option<TenantBinding> {
        match self {
            TenantResolution::Resolved(binding) => Some(binding),
            _ => None,
        }
    }
}

/// Resolves the tenant account from a bearer token.
pub struct TenantResolver {
    verifier: Option<Arc<dyn TokenVerifier>>,
    memberships: Option<Arc<dyn MembershipStore>>,
    timeout: Duration,
}

impl TenantResolver {
    pub fn new(
        verifier: Option<Arc<dyn TokenVerifier>>,
        memberships: Option<Arc<dyn MembershipStore>>,
        timeout: Duration,
    ) -> Self {
        Self {
            verifier,
            memberships,
            timeout,
        }
    }

    /// A resolver that never binds a tenant.
    pub fn disabled() -> Self {
        Self::new(None, None, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        self.verifier.is_some() && self.memberships.is_some()
    }

    /// Runs the resolution state machine for one request.
    pub async fn bind(
        &self,
        existing: Option<&TenantBinding>,
        bearer_token: Option<&str>,
    ) -> TenantResolution {
        if existing.is_some() {
            return TenantResolution::AlreadyBound;
        }
        if !self.is_enabled() {
            return TenantResolution::Disabled;
        }
        let Some(token) = bearer_token.filter(|token| !token.is_empty()) else {
            return TenantResolution::MissingToken;
        };

        match self.resolve(token).await {
            Ok(Some(account_id)) => {
                TenantResolution::Resolved(TenantBinding::from_bearer_token(account_id))
            }
            Ok(None) => TenantResolution::Unresolved,
            Err(err) => TenantResolution::Failed(err),
        }
    }

    /// Maps a bearer token to the account of the caller's oldest accepted
    /// membership.
    pub async fn resolve(&self, token: &str) -> Result<Option<AccountId>, TenantResolutionError> {
        let (Some(verifier), Some(memberships)) = (&self.verifier, &self.memberships) else {
            return Ok(None);
        };

        within(
            self.timeout,
            lookup(verifier.as_ref(), memberships.as_ref(), token),
        )
        .await
        .ok_or(TenantResolutionError::Timeout(self.timeout))?
    }
}

async fn lookup(
    verifier: &dyn TokenVerifier,
    memberships: &dyn MembershipStore,
    token: &str,
) -> Result<Option<AccountId>, TenantResolutionError> {
    let Some(user_id) = verifier.verify(token).await? else {
        return Ok(None);
    };

    let rows = memberships.accepted_memberships(user_id).await?;
    Ok(earliest_accepted(rows).map(|membership| membership.account_id))
}

/// Picks the oldest accepted membership; ties keep store order.
pub fn earliest_accepted(memberships: Vec<Membership>) -> Option<Membership> {
    memberships
        .into_iter()
        .filter(|membership| membership.status == MembershipStatus::Accepted)
        .min_by_key(|membership| membership.created_at)
}
