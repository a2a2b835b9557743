//! Domain layer for the tenant and origin gate.
//!
//! This crate contains:
//! - Domain models (tenant bindings, custom domains, memberships, API keys)
//! - Gate services (allow-list matching, custom-domain cache and
//!   authorization, tenant resolution, API-key authentication)
//! - The collaborator traits the persistence and identity layers implement

pub mod error;
pub mod models;
pub mod services;

pub use error::StoreError;
