pub mod security;
pub mod settings;

pub use security::{SecurityConfig, MIN_SECRET_LENGTH};
pub use settings::{AuthSettings, DEFAULT_AUTH_HEADER, DEFAULT_TOKEN_EXPIRATION};
