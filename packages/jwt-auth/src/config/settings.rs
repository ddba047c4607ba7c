//! Auth settings loaded from the process environment.
//!
//! Variables:
//! - `JWT_SECRET` (required, at least 10 characters)
//! - `JWT_ALGORITHM` (`HS256` | `HS384` | `HS512`, default `HS256`)
//! - `JWT_AUTH_HEADER` (default `Authorization`)
//! - `JWT_DEFAULT_EXPIRATION_SECS` (default one day)
//! - `JWT_EXCLUDE_PATHS` (comma separated path prefixes, optional)

use std::env;
use std::fmt;
use std::time::Duration;

use crate::auth::algorithm::SigningAlgorithm;
use crate::errors::ConfigError;

pub const DEFAULT_AUTH_HEADER: &str = "Authorization";
pub const DEFAULT_TOKEN_EXPIRATION: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
pub struct AuthSettings {
    pub token_secret: String,
    pub algorithm: SigningAlgorithm,
    pub auth_header: String,
    pub default_token_expiration: Duration,
    pub exclude: Vec<String>,
}

impl AuthSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_secret = lookup("JWT_SECRET")
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingEnv("JWT_SECRET"))?;

        let algorithm = match lookup("JWT_ALGORITHM") {
            Some(value) => value.parse::<SigningAlgorithm>().map_err(|e| ConfigError::InvalidEnv {
                name: "JWT_ALGORITHM",
                detail: e.to_string(),
            })?,
            None => SigningAlgorithm::default(),
        };

        let auth_header = lookup("JWT_AUTH_HEADER")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTH_HEADER.to_string());

        let default_token_expiration = match lookup("JWT_DEFAULT_EXPIRATION_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidEnv {
                    name: "JWT_DEFAULT_EXPIRATION_SECS",
                    detail: e.to_string(),
                })?,
            None => DEFAULT_TOKEN_EXPIRATION,
        };

        let exclude = lookup("JWT_EXCLUDE_PATHS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|prefix| !prefix.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            token_secret,
            algorithm,
            auth_header,
            default_token_expiration,
            exclude,
        })
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("token_secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("auth_header", &self.auth_header)
            .field("default_token_expiration", &self.default_token_expiration)
            .field("exclude", &self.exclude)
            .finish()
    }
}
