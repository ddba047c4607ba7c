//! Claim set carried inside a token.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TokenError;

/// Claim names owned by [`Claims`] fields. Extra claims may not reuse them.
pub const RESERVED_CLAIMS: [&str; 6] = ["sub", "exp", "iat", "iss", "aud", "jti"];

/// Decoded token payload.
///
/// Optional registered claims are omitted from the payload when `None`, and
/// decode back to `None` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject; resolved to an application identity.
    pub sub: String,
    /// Expiry (seconds since epoch)
    pub exp: i64,
    /// Issued-at (seconds since epoch)
    #[serde(default)]
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl Claims {
    pub fn new(sub: impl Into<String>, exp: i64) -> Self {
        Self {
            sub: sub.into(),
            exp,
            iat: 0,
            iss: None,
            aud: None,
            jti: None,
            extra: BTreeMap::new(),
        }
    }

    /// Claims issued at `now` that expire `ttl` later.
    pub fn expiring_in(sub: impl Into<String>, now: SystemTime, ttl: Duration) -> Self {
        let iat = unix_seconds(now);
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let mut claims = Self::new(sub, iat.saturating_add(ttl));
        claims.iat = iat;
        claims
    }

    pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    pub fn with_audience(mut self, aud: impl Into<String>) -> Self {
        self.aud = Some(aud.into());
        self
    }

    pub fn with_jti(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Add a caller-defined claim, returning the previous value if any.
    ///
    /// Fails with `InvalidClaims` when `name` is one of [`RESERVED_CLAIMS`].
    pub fn insert_extra(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, TokenError> {
        let name = name.into();
        if is_reserved(&name) {
            return Err(TokenError::invalid_claims(format!(
                "'{name}' is a reserved claim"
            )));
        }
        Ok(self.extra.insert(name, value.into()))
    }

    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    pub fn extra_claim(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        unix_seconds(now) >= self.exp
    }

    pub(crate) fn validate(&self) -> Result<(), TokenError> {
        if self.sub.is_empty() {
            return Err(TokenError::invalid_claims("sub must not be empty"));
        }
        if let Some(name) = self.extra.keys().find(|name| is_reserved(name)) {
            return Err(TokenError::invalid_claims(format!(
                "'{name}' is a reserved claim"
            )));
        }
        Ok(())
    }
}

fn is_reserved(name: &str) -> bool {
    RESERVED_CLAIMS.contains(&name)
}

/// Seconds since the Unix epoch; negative before it.
pub(crate) fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs())
            .map(|secs| -secs)
            .unwrap_or(i64::MIN),
    }
}
