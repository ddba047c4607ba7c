//! Error codes for the JWT authentication layer.
//!
//! All error codes are SCREAMING_SNAKE_CASE. Only `Unauthorized` and
//! `Internal` ever reach an HTTP response body; the precise codes are for
//! logs.

use core::fmt;

/// Centralized error codes.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication
    /// Authentication required (the only code exposed for 401 responses)
    Unauthorized,
    /// Configured header absent or empty
    UnauthorizedMissingCredentials,
    /// Token could not be parsed
    UnauthorizedMalformedJwt,
    /// Token signature does not verify under the configured key
    UnauthorizedInvalidSignature,
    /// Token has expired
    UnauthorizedExpiredJwt,
    /// Identity resolver returned no identity for the subject
    UnauthorizedUnknownSubject,

    // Issuance
    /// Claims rejected before encoding
    InvalidClaims,
    /// Token encoding failed
    TokenEncoding,
    /// Login response body could not be serialized
    ResponseBody,

    // Collaborators
    /// Identity resolver failed
    ResolverFailure,
    /// Token store hook failed
    TokenStoreFailure,

    // System Errors
    /// Configuration error
    ConfigError,
    /// Internal server error (the only code exposed for 5xx responses)
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingCredentials => "UNAUTHORIZED_MISSING_CREDENTIALS",
            Self::UnauthorizedMalformedJwt => "UNAUTHORIZED_MALFORMED_JWT",
            Self::UnauthorizedInvalidSignature => "UNAUTHORIZED_INVALID_SIGNATURE",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::UnauthorizedUnknownSubject => "UNAUTHORIZED_UNKNOWN_SUBJECT",

            Self::InvalidClaims => "INVALID_CLAIMS",
            Self::TokenEncoding => "TOKEN_ENCODING",
            Self::ResponseBody => "RESPONSE_BODY",

            Self::ResolverFailure => "RESOLVER_FAILURE",
            Self::TokenStoreFailure => "TOKEN_STORE_FAILURE",

            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
