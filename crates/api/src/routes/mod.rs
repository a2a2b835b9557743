//! HTTP route handlers.

pub mod custom_domains;
pub mod health;
pub mod tenant;
