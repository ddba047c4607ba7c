//! Error types for the JWT authentication layer.
//!
//! Configuration and codec errors live here; the HTTP-facing `AuthError`
//! lives in `crate::error`.

pub mod config;
pub mod error_code;
pub mod token;

pub use config::ConfigError;
pub use error_code::ErrorCode;
pub use token::TokenError;
