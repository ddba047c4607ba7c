//! Caller-supplied collaborators: identity resolution and token storage.

use std::error::Error as StdError;
use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::claims::Claims;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The identity lookup itself failed. Surfaces as a server error, never as
/// an authentication failure.
#[derive(Error, Debug)]
#[error("identity resolver failed: {message}")]
pub struct ResolverError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl ResolverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// The token store hook failed during login.
#[derive(Error, Debug)]
#[error("token store failed: {message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Maps a token subject to an application identity.
///
/// `Ok(None)` means the subject is unknown and the request is rejected with
/// 401. `Err` means the lookup itself failed.
#[async_trait]
pub trait IdentityResolver: Send + Sync + 'static {
    type Identity: Clone + Send + Sync + 'static;

    async fn resolve(&self, subject: &str) -> Result<Option<Self::Identity>, ResolverError>;
}

/// Receives the claims of every token minted by the login flow.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    async fn store(&self, claims: &Claims) -> Result<(), StoreError>;
}

/// [`IdentityResolver`] backed by an async closure. See [`resolver_fn`].
pub struct FnResolver<F, U> {
    f: F,
    _identity: PhantomData<fn() -> U>,
}

/// Adapt an async closure `subject -> Result<Option<U>, ResolverError>`.
///
/// ```ignore
/// let resolver = resolver_fn(move |sub: String| {
///     let users = users.clone();
///     async move { Ok(users.get(&sub).await) }
/// });
/// ```
pub fn resolver_fn<F, Fut, U>(f: F) -> FnResolver<F, U>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<U>, ResolverError>> + Send + 'static,
    U: Clone + Send + Sync + 'static,
{
    FnResolver {
        f,
        _identity: PhantomData,
    }
}

#[async_trait]
impl<F, Fut, U> IdentityResolver for FnResolver<F, U>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<U>, ResolverError>> + Send + 'static,
    U: Clone + Send + Sync + 'static,
{
    type Identity = U;

    async fn resolve(&self, subject: &str) -> Result<Option<U>, ResolverError> {
        (self.f)(subject.to_string()).await
    }
}
