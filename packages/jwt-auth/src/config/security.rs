use std::fmt;

use crate::auth::algorithm::SigningAlgorithm;
use crate::errors::ConfigError;

/// Minimum number of characters accepted for a token secret.
pub const MIN_SECRET_LENGTH: usize = 10;

/// Signing secret and algorithm shared by the codec and the middleware.
///
/// Validated once at construction; never mutated afterwards.
#[derive(Clone)]
pub struct SecurityConfig {
    secret: Vec<u8>,
    algorithm: SigningAlgorithm,
}

impl SecurityConfig {
    /// Fails with `SecretTooShort` when `secret` has fewer than
    /// [`MIN_SECRET_LENGTH`] characters.
    pub fn new(
        secret: impl Into<String>,
        algorithm: SigningAlgorithm,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.chars().count() < MIN_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort {
                min: MIN_SECRET_LENGTH,
            });
        }
        Ok(Self {
            secret: secret.into_bytes(),
            algorithm,
        })
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
