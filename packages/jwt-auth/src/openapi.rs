//! OpenAPI description of the authentication scheme.

use actix_web::http::header::AUTHORIZATION;
use utoipa::openapi::security::{
    ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme,
};

use crate::jwt_auth::JwtAuth;

const DESCRIPTION: &str = "JWT api-key authentication and authorization.";

impl<U> JwtAuth<U>
where
    U: Clone + Send + Sync + 'static,
{
    /// Security scheme for the configured header.
    ///
    /// `Authorization` is described as an HTTP bearer scheme; any other header
    /// as an API key carried in that header.
    pub fn security_scheme(&self) -> SecurityScheme {
        if *self.auth_header() == AUTHORIZATION {
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(DESCRIPTION))
                    .build(),
            )
        } else {
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                self.auth_header().as_str(),
                DESCRIPTION,
            )))
        }
    }
}
