//! Shared utilities for the grooming platform backend.
//!
//! This crate provides functionality with no knowledge of tenants or domains:
//! - API key hashing and format checks
//! - Bearer token (JWT) verification

pub mod crypto;
pub mod jwt;
