//! Identity session: sign-in through the identity provider

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::AppConfig,
    models::{Principal, Session},
};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Sign-in cancelled: {0}")]
    Cancelled(String),

    #[error("Login state does not match")]
    StateMismatch,

    #[error("Invalid identity assertion: {0}")]
    InvalidAssertion(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid principal: {0}")]
    InvalidPrincipal(String),

    #[error("Invalid identity provider URL: {0}")]
    ProviderUrl(String),
}

/// Claims of the assertion the identity provider redirects back with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Principal text
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl IdentityClaims {
    pub fn new(principal: &Principal, valid_for: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: principal.to_string(),
            iat: now.timestamp(),
            exp: (now + valid_for).timestamp(),
        }
    }

    pub fn sign(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

#[derive(Clone)]
pub struct IdentityService {
    provider_url: String,
    callback_url: String,
    secret: String,
}

impl IdentityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            provider_url: config.identity.provider_url.clone(),
            callback_url: config.callback_url(),
            secret: config.identity.assertion_secret.clone(),
        }
    }

    /// Where to send the browser to sign in
    pub fn sign_in_url(&self, state: &str) -> Result<Url, IdentityError> {
        Url::parse_with_params(
            &self.provider_url,
            &[("redirect_uri", self.callback_url.as_str()), ("state", state)],
        )
        .map_err(|e| IdentityError::ProviderUrl(e.to_string()))
    }

    /// Verify the provider's assertion and open a session for its principal
    pub fn complete_sign_in(&self, token: &str) -> Result<Session, IdentityError> {
        let data = decode::<IdentityClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        let principal: Principal = data
            .claims
            .sub
            .parse()
            .map_err(IdentityError::InvalidPrincipal)?;

        tracing::info!(principal = %principal, "Signed in");
        Ok(Session::new(principal, token))
    }
}
