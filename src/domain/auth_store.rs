//! Per-browser authentication state.
//!
//! Holds the token and user record of the last successful login, and answers
//! "is this browser authenticated?" and "who is the current user?" without a
//! round trip to the record store.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::domain::entities::{AuthData, UserRecord};

#[derive(Debug, Clone, Default)]
pub struct AuthStore {
    token: Option<String>,
    record: Option<UserRecord>,
}

#[derive(Deserialize)]
struct Claims {
    exp: i64,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored token and record.
    pub fn save(&mut self, auth: AuthData) {
        self.token = Some(auth.token);
        self.record = Some(auth.record);
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.record = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn record(&self) -> Option<&UserRecord> {
        self.record.as_ref()
    }

    /// Returns true when a token is stored and it has not expired at `now`.
    ///
    /// Tokens that are not JWTs, or whose payload has no `exp` claim, are
    /// treated as invalid.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.token
            .as_deref()
            .and_then(token_expiry)
            .is_some_and(|exp| exp > now)
    }
}

/// Reads the `exp` claim of a JWT without verifying its signature.
///
/// The signature is the record store's business; here the claim only decides
/// whether it is worth presenting the token at all.
pub fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;

    Utc.timestamp_opt(claims.exp, 0).single()
}
