//! Per-request origin admission.
//!
//! Combines the static allow-list with the custom-domain authorizer:
//! `allowed = allow_list(origin) || custom_domain(origin)`. The store is
//! only reached for origins the allow-list rejects.

use super::allow_list::AllowList;
use super::custom_domain::{CustomDomainAuthorizer, DomainVerdict};

/// How the gate decided on an origin.
#[derive(Debug)]
pub enum OriginDecision {
    /// No `Origin` header (same-origin, curl, server to server).
    NoOrigin,
    /// Matched a static allow-list entry.
    AllowList,
    /// Fell through to the custom-domain check.
    CustomDomain(DomainVerdict),
}

impl OriginDecision {
    pub fn is_allowed(&self) -> bool {
        match self {
            OriginDecision::NoOrigin | OriginDecision::AllowList => true,
            OriginDecision::CustomDomain(verdict) => verdict.is_allowed(),
        }
    }

    /// Short label describing the path taken, for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            OriginDecision::NoOrigin => "no_origin",
            OriginDecision::AllowList => "allow_list",
            OriginDecision::CustomDomain(DomainVerdict::Cached(_)) => "domain_cache_hit",
            OriginDecision::CustomDomain(DomainVerdict::Verified(true)) => "domain_verified",
            OriginDecision::CustomDomain(DomainVerdict::Verified(false)) => "domain_rejected",
            OriginDecision::CustomDomain(DomainVerdict::LookupFailed(_)) => "domain_lookup_failed",
            OriginDecision::CustomDomain(DomainVerdict::Unconfigured) => "domain_unconfigured",
        }
    }
}

/// Origin gate consulted before any route runs.
pub struct OriginGate {
    allow_list: AllowList,
    domains: CustomDomainAuthorizer,
}

impl OriginGate {
    pub fn new(allow_list: AllowList, domains: CustomDomainAuthorizer) -> Self {
        Self {
            allow_list,
            domains,
        }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn domains(&self) -> &CustomDomainAuthorizer {
        &self.domains
    }

    /// Decides whether a request carrying `origin` may proceed.
    pub async fn evaluate(&self, origin: Option<&str>) -> OriginDecision {
        let origin = origin.filter(|origin| !origin.is_empty());

        match origin {
            _ if self.allow_list.permits(origin) => match origin {
                Some(_) => OriginDecision::AllowList,
                None => OriginDecision::NoOrigin,
            },
            Some(origin) => OriginDecision::CustomDomain(self.domains.check(origin).await),
            None => OriginDecision::NoOrigin,
        }
    }

    /// Returns `true` if a request carrying `origin` may proceed.
    pub async fn is_allowed(&self, origin: Option<&str>) -> bool {
        self.evaluate(origin).await.is_allowed()
    }
}
