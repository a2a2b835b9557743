//! Repository implementations.
//!
//! Each repository implements one of the gate's store traits against
//! PostgreSQL.

pub mod account_member;
pub mod api_key;
pub mod custom_domain;

pub use account_member::AccountMemberRepository;
pub use api_key::ApiKeyRepository;
pub use custom_domain::CustomDomainRepository;
