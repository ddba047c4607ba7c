use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};

use crate::auth::claims::Claims;
use crate::error::AuthError;
use crate::errors::ConfigError;
use crate::jwt_auth::JwtAuth;

/// Resolved identity plus the claims of the token that produced it.
///
/// Inside a scope wrapped by [`JwtAuth::middleware`] this is read from
/// request extensions. Used as a plain extractor on an unwrapped route it
/// authenticates the request itself, using the `web::Data<JwtAuth<U>>`
/// registered on the app.
///
/// ```ignore
/// async fn me(auth: Authenticated<User>) -> HttpResponse {
///     HttpResponse::Ok().json(auth.identity())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authenticated<U> {
    identity: U,
    claims: Claims,
}

impl<U> Authenticated<U> {
    pub fn new(identity: U, claims: Claims) -> Self {
        Self { identity, claims }
    }

    pub fn identity(&self) -> &U {
        &self.identity
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn into_parts(self) -> (U, Claims) {
        (self.identity, self.claims)
    }
}

impl<U> FromRequest for Authenticated<U>
where
    U: Clone + Send + Sync + 'static,
{
    type Error = AuthError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(authenticated) = req.extensions().get::<Authenticated<U>>() {
            let authenticated = authenticated.clone();
            return Box::pin(async move { Ok(authenticated) });
        }

        let req = req.clone();
        Box::pin(async move {
            let auth = req
                .app_data::<web::Data<JwtAuth<U>>>()
                .cloned()
                .ok_or(ConfigError::NotRegistered)?;

            let authenticated = auth.authenticate(&req).await?;
            req.extensions_mut().insert(authenticated.clone());
            Ok(authenticated)
        })
    }
}
