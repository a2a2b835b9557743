//! Domain models.

pub mod api_key;
pub mod custom_domain;
pub mod membership;
pub mod tenant;

pub use api_key::ApiKey;
pub use custom_domain::{CustomDomain, CustomDomainStatus};
pub use membership::{Membership, MembershipStatus};
pub use tenant::{AccountId, TenantBinding, TenantSource};
