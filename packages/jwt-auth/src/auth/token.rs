//! Compact JWT encoding and verification.

use std::time::SystemTime;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{Map, Value};
use subtle::ConstantTimeEq;

use crate::auth::claims::{unix_seconds, Claims};
use crate::config::security::SecurityConfig;
use crate::errors::TokenError;

/// Sign `claims` into a compact token.
///
/// `iat` is stamped as `max(now, claims.iat)`. Output is deterministic for
/// identical claims and `now`.
pub fn encode_token(
    claims: &Claims,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, TokenError> {
    claims.validate()?;

    let mut claims = claims.clone();
    claims.iat = claims.iat.max(unix_seconds(now));

    encode(
        &Header::new(security.algorithm().to_jsonwebtoken()),
        &claims,
        &EncodingKey::from_secret(security.secret()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verify `token` and return its claims.
///
/// The `alg` the token declares in its header is ignored; the signature is
/// always recomputed with the configured algorithm and compared in constant
/// time.
///
/// Errors:
/// - empty input, wrong segment count, undecodable header/payload or
///   missing/mistyped claims → `Malformed`
/// - signature mismatch → `InvalidSignature`
/// - `now >= exp` → `Expired`
pub fn decode_token(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<Claims, TokenError> {
    if token.is_empty() {
        return Err(TokenError::malformed("empty token"));
    }

    let mut segments = token.split('.');
    let (header, payload, signature) = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(payload), Some(signature), None) => (header, payload, signature),
        _ => return Err(TokenError::malformed("expected three segments")),
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::malformed("header is not base64url"))?;
    serde_json::from_slice::<Map<String, Value>>(&header_bytes)
        .map_err(|_| TokenError::malformed("header is not a JSON object"))?;

    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::malformed("payload is not base64url"))?;

    verify_signature(
        &token[..header.len() + 1 + payload.len()],
        signature,
        security,
    )?;

    let claims: Claims = serde_json::from_slice(&payload_bytes)
        .map_err(|e| TokenError::malformed(format!("invalid claims: {e}")))?;
    if claims.sub.is_empty() {
        return Err(TokenError::malformed("sub must not be empty"));
    }
    if claims.is_expired_at(now) {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

fn verify_signature(
    signing_input: &str,
    signature: &str,
    security: &SecurityConfig,
) -> Result<(), TokenError> {
    let provided = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| TokenError::InvalidSignature)?;
    let expected = security
        .algorithm()
        .sign(security.secret(), signing_input.as_bytes())
        .map_err(|_| TokenError::InvalidSignature)?;

    if bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
        Ok(())
    } else {
        Err(TokenError::InvalidSignature)
    }
}
