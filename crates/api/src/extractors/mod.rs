//! Custom Axum extractors.
//!
//! Both read what the authentication middleware left in the request
//! extensions; neither touches the database.

pub mod api_key;
pub mod tenant;

pub use api_key::ApiKeyAuth;
pub use tenant::RequireTenant;
