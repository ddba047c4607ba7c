use thiserror::Error;

/// Setup errors. Raised while building the auth configuration, or by a
/// login or extractor call that is wired up incorrectly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("token secret is required")]
    MissingSecret,
    #[error("token secret must be at least {min} characters long")]
    SecretTooShort { min: usize },
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("invalid auth header name: {0}")]
    InvalidHeaderName(String),
    #[error("default token expiration must be at least one second")]
    InvalidExpiration,
    #[error("environment variable {0} must be set")]
    MissingEnv(&'static str),
    #[error("environment variable {name} is invalid: {detail}")]
    InvalidEnv { name: &'static str, detail: String },
    #[error("login response status must be 2xx, got {0}")]
    InvalidLoginStatus(u16),
    #[error("JwtAuth is not registered as app data")]
    NotRegistered,
}
