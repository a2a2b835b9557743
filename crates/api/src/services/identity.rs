//! Identity provider adapters.
//!
//! Both adapters turn a bearer token into the caller's user id for tenant
//! resolution. [`JwtIdentityProvider`] verifies tokens locally with the
//! provider's signing key; [`RemoteIdentityProvider`] asks the provider's
//! user endpoint.

use async_trait::async_trait;
use domain::services::{TokenError, TokenVerifier};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::jwt::{extract_user_id, JwtError, JwtVerifier};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::IdentityConfig;

/// Errors raised while building an identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid JWT configuration: {0}")]
    Jwt(#[from] JwtError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Verifies bearer tokens locally (HS256 secret or RS256 public key).
#[derive(Debug, Clone)]
pub struct JwtIdentityProvider {
    verifier: JwtVerifier,
}

impl JwtIdentityProvider {
    pub fn new(verifier: JwtVerifier) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl TokenVerifier for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Option<Uuid>, TokenError> {
        let claims = self
            .verifier
            .verify(token)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        match extract_user_id(&claims) {
            Ok(user_id) => Ok(Some(user_id)),
            Err(err) => {
                debug!(error = %err, "Token subject is not a user id");
                Ok(None)
            }
        }
    }
}

/// User object returned by the provider's user endpoint.
#[derive(Debug, Deserialize)]
struct RemoteUser {
    #[serde(default)]
    id: Option<Uuid>,
}

/// Verifies bearer tokens against the provider's `/auth/v1/user` endpoint.
#[derive(Debug, Clone)]
pub struct RemoteIdentityProvider {
    client: Client,
    user_url: String,
    api_key: String,
    timeout: Duration,
}

impl RemoteIdentityProvider {
    /// Create a new remote provider client. A zero timeout leaves requests
    /// unbounded.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let mut builder = Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            user_url: format!("{}/auth/v1/user", base_url.trim().trim_end_matches('/')),
            api_key: api_key.into(),
            timeout,
        })
    }

    pub fn user_url(&self) -> &str {
        &self.user_url
    }
}

#[async_trait]
impl TokenVerifier for RemoteIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Option<Uuid>, TokenError> {
        let response = self
            .client
            .get(&self.user_url)
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TokenError::Provider(format!(
                        "Identity provider timed out after {}ms",
                        self.timeout.as_millis()
                    ))
                } else {
                    TokenError::Provider(e.to_string())
                }
            })?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(TokenError::Invalid(format!(
                "Identity provider rejected token: HTTP {}",
                status
            ))),
            s if s.is_success() => {
                let user: RemoteUser = response
                    .json()
                    .await
                    .map_err(|e| TokenError::Provider(format!("Invalid user response: {}", e)))?;
                Ok(user.id)
            }
            _ => Err(TokenError::Provider(format!(
                "Identity provider returned HTTP {}",
                status
            ))),
        }
    }
}

/// Builds the token verifier selected by `config`.
///
/// Precedence: remote provider, then RS256 public key, then HS256 secret.
/// Returns `None` when nothing is configured.
pub fn build_token_verifier(
    config: &IdentityConfig,
) -> Result<Option<Arc<dyn TokenVerifier>>, IdentityError> {
    if config.has_remote() {
        let provider =
            RemoteIdentityProvider::new(&config.remote_url, &config.remote_api_key, config.timeout())?;
        return Ok(Some(Arc::new(provider)));
    }

    let verifier = if !config.jwt_public_key.is_empty() {
        JwtVerifier::from_rsa_pem(&config.jwt_public_key, config.leeway_secs)?
    } else if !config.jwt_secret.is_empty() {
        JwtVerifier::from_secret(&config.jwt_secret, config.leeway_secs)?
    } else {
        return Ok(None);
    };

    let verifier = if config.audience.is_empty() {
        verifier
    } else {
        verifier.with_audience(&config.audience)
    };

    Ok(Some(Arc::new(JwtIdentityProvider::new(verifier))))
}
