#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! JWT authentication for actix-web.
//!
//! [`JwtAuth`] holds the signing configuration and the caller's
//! [`IdentityResolver`]. Its middleware gates a scope, its login flow mints
//! tokens, and [`Authenticated`] hands the resolved identity to handlers.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod jwt_auth;
pub mod middleware;
pub mod openapi;
pub mod resolver;
pub mod trace_ctx;

pub use auth::{decode_token, encode_token, Claims, SigningAlgorithm, RESERVED_CLAIMS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AuthSettings, SecurityConfig};
pub use error::{AuthError, ProblemDetails};
pub use errors::{ConfigError, ErrorCode, TokenError};
pub use extractors::Authenticated;
pub use jwt_auth::{JwtAuth, JwtAuthBuilder, Login, TokenOptions};
pub use middleware::{JwtAuthentication, RequestTrace};
pub use resolver::{resolver_fn, FnResolver, IdentityResolver, ResolverError, StoreError, TokenStore};

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    auth_test_support::logging::init();
}
