use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::{ConfigError, ErrorCode, TokenError};
use crate::resolver::{ResolverError, StoreError};
use crate::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Errors raised while authenticating a request or issuing a token.
///
/// Every credential failure renders as the same opaque 401; the precise kind
/// is only available through [`AuthError::code`] for logging.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("unknown subject")]
    UnknownSubject,
    #[error(transparent)]
    Resolver(#[from] ResolverError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to serialize response body: {0}")]
    ResponseBody(String),
}

impl AuthError {
    /// Precise error code, for logs only.
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::MissingCredentials => ErrorCode::UnauthorizedMissingCredentials,
            AuthError::Token(e) => e.code(),
            AuthError::UnknownSubject => ErrorCode::UnauthorizedUnknownSubject,
            AuthError::Resolver(_) => ErrorCode::ResolverFailure,
            AuthError::Store(_) => ErrorCode::TokenStoreFailure,
            AuthError::Config(_) => ErrorCode::ConfigError,
            AuthError::ResponseBody(_) => ErrorCode::ResponseBody,
        }
    }

    /// True when the request is rejected because of its credentials.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            AuthError::MissingCredentials | AuthError::UnknownSubject => true,
            AuthError::Token(e) => e.is_credential_failure(),
            _ => false,
        }
    }

    pub fn status(&self) -> StatusCode {
        if self.is_unauthorized() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn public_code(&self) -> ErrorCode {
        if self.is_unauthorized() {
            ErrorCode::Unauthorized
        } else {
            ErrorCode::Internal
        }
    }

    fn public_detail(&self) -> &'static str {
        if self.is_unauthorized() {
            "Authentication required"
        } else {
            "Internal server error"
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.public_code();
        let trace_id = trace_ctx::trace_id();

        let problem_details = ProblemDetails {
            type_: format!("urn:jwt-auth:problem:{}", code.as_str().to_lowercase()),
            title: Self::humanize_code(code.as_str()),
            status: status.as_u16(),
            detail: self.public_detail().to_string(),
            code: code.as_str().to_string(),
            trace_id: trace_id.clone(),
        };

        let mut builder = HttpResponse::build(status);
        builder
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id));
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(problem_details)
    }
}
