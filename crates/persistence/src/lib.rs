//! Persistence layer for the tenant and origin gate.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - PostgreSQL implementations of the gate's store traits

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
