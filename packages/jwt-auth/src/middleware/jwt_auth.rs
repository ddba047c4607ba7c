//! Authentication middleware.
//!
//! Runs the full decision procedure on every request in the wrapped scope and
//! stores the resulting [`Authenticated`] in request extensions before the
//! handler runs. Rejected requests never reach the handler; their Problem
//! Details response is rendered here, inside the request's trace scope.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::trace;

use crate::extractors::authenticated::Authenticated;
use crate::jwt_auth::JwtAuth;

/// Created by [`JwtAuth::middleware`].
pub struct JwtAuthentication<U> {
    auth: JwtAuth<U>,
}

impl<U> JwtAuthentication<U> {
    pub(crate) fn new(auth: JwtAuth<U>) -> Self {
        Self { auth }
    }
}

impl<S, B, U> Transform<S, ServiceRequest> for JwtAuthentication<U>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    U: Clone + Send + Sync + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthenticationMiddleware<S, U>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthenticationMiddleware {
            service: Rc::new(service),
            auth: self.auth.clone(),
        }))
    }
}

pub struct JwtAuthenticationMiddleware<S, U> {
    service: Rc<S>,
    auth: JwtAuth<U>,
}

impl<S, B, U> Service<ServiceRequest> for JwtAuthenticationMiddleware<S, U>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    U: Clone + Send + Sync + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        if self.auth.is_excluded(req.path()) {
            trace!(path = %req.path(), "path excluded from authentication");
            let fut = service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let auth = self.auth.clone();
        Box::pin(async move {
            let outcome = auth.authenticate(req.request()).await;
            match outcome {
                Ok(authenticated) => {
                    req.extensions_mut().insert::<Authenticated<U>>(authenticated);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => Ok(req.into_response(err.error_response()).map_into_right_body()),
            }
        })
    }
}
