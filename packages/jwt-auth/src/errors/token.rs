use thiserror::Error;

use super::ErrorCode;

/// Codec errors. Each kind stays distinct here; they are only collapsed into
/// an opaque 401 at the HTTP boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl TokenError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed(detail.into())
    }

    pub(crate) fn invalid_claims(detail: impl Into<String>) -> Self {
        Self::InvalidClaims(detail.into())
    }

    /// True for failures caused by the presented token rather than by the
    /// issuing side.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            Self::Malformed(_) | Self::InvalidSignature | Self::Expired
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Malformed(_) => ErrorCode::UnauthorizedMalformedJwt,
            Self::InvalidSignature => ErrorCode::UnauthorizedInvalidSignature,
            Self::Expired => ErrorCode::UnauthorizedExpiredJwt,
            Self::InvalidClaims(_) => ErrorCode::InvalidClaims,
            Self::Encoding(_) => ErrorCode::TokenEncoding,
        }
    }
}
