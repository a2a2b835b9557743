//! External service integrations.

pub mod identity;

pub use identity::{
    build_token_verifier, IdentityError, JwtIdentityProvider, RemoteIdentityProvider,
};
