//! Database entity definitions.
//!
//! Entities map directly to database rows and are converted into domain
//! models before leaving this crate.

pub mod account_member;
pub mod api_key;
pub mod custom_domain;

pub use account_member::{AccountMemberEntity, MembershipStatusDb};
pub use api_key::ApiKeyEntity;
pub use custom_domain::{CustomDomainEntity, CustomDomainStatusDb};
