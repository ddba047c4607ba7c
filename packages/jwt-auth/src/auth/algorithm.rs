//! Allow-list of symmetric signing algorithms.

use std::fmt;
use std::str::FromStr;

use hmac::digest::{InvalidLength, KeyInit};
use hmac::{Hmac, Mac};
use jsonwebtoken::Algorithm;
use sha2::{Sha256, Sha384, Sha512};

use crate::errors::ConfigError;

/// HMAC signing algorithms accepted by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl SigningAlgorithm {
    pub const ALL: [SigningAlgorithm; 3] = [Self::HS256, Self::HS384, Self::HS512];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        }
    }

    pub(crate) fn to_jsonwebtoken(self) -> Algorithm {
        match self {
            Self::HS256 => Algorithm::HS256,
            Self::HS384 => Algorithm::HS384,
            Self::HS512 => Algorithm::HS512,
        }
    }

    /// HMAC of `message` under `secret`.
    pub(crate) fn sign(self, secret: &[u8], message: &[u8]) -> Result<Vec<u8>, InvalidLength> {
        match self {
            Self::HS256 => hmac_digest::<Hmac<Sha256>>(secret, message),
            Self::HS384 => hmac_digest::<Hmac<Sha384>>(secret, message),
            Self::HS512 => hmac_digest::<Hmac<Sha512>>(secret, message),
        }
    }
}

fn hmac_digest<M: Mac + KeyInit>(secret: &[u8], message: &[u8]) -> Result<Vec<u8>, InvalidLength> {
    let mut mac = <M as KeyInit>::new_from_slice(secret)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::HS256),
            "HS384" => Ok(Self::HS384),
            "HS512" => Ok(Self::HS512),
            _ => Err(ConfigError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}
