//! Session guard.
//!
//! The bearer token is read once from persisted storage and handed to every
//! protected view through an explicit [`Session`] value. Views never write
//! it. A missing token sends the user to [`Route::Login`] before any request
//! is issued; a 401 from the server does the same after the fact.

use std::time::Duration;

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

use crate::route::Route;
use crate::types::Timestamp;

/// Bearer token. `Debug` is redacted so tokens never reach the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// The claims the console cares about. Everything else is ignored.
#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Authentication context shared by all views of one run.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<Token>,
}

impl Session {
    /// Build a session from a stored token. Blank tokens count as absent.
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Token);
        Self { token }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Guard a protected view: the token, or the route to redirect to.
    pub fn require(&self) -> Result<&Token, Route> {
        match &self.token {
            Some(token) => Ok(token),
            None => {
                tracing::debug!("No auth token, redirecting to login");
                Err(Route::Login)
            }
        }
    }

    /// Expiry of a JWT token, read without verifying its signature.
    ///
    /// The console holds no signing secret; the server stays the authority
    /// on validity. Returns `None` for opaque tokens or tokens without an
    /// `exp` claim.
    pub fn expires_at(&self) -> Option<Timestamp> {
        let token = self.token.as_ref()?;

        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<ExpiryClaims>(token.as_str(), &DecodingKey::from_secret(&[]), &validation)
            .ok()?;
        chrono::DateTime::from_timestamp(data.claims.exp?, 0)
    }

    /// Time left until expiry, zero once expired, `None` when unknown.
    pub fn remaining(&self, now: Timestamp) -> Option<Duration> {
        let expires_at = self.expires_at()?;
        Some((expires_at - now).to_std().unwrap_or(Duration::ZERO))
    }
}
