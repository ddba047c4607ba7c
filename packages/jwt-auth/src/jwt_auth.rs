//! Process-wide JWT auth configuration, request authentication and login.
//!
//! ```ignore
//! let auth = JwtAuth::builder(resolver_fn(lookup_user))
//!     .algorithm("HS256")
//!     .auth_header("Authorization")
//!     .default_token_expiration(Duration::from_secs(15 * 60))
//!     .token_secret("supersecretvalue")
//!     .build()?;
//!
//! App::new()
//!     .app_data(web::Data::new(auth.clone()))
//!     .service(web::scope("/api").wrap(auth.middleware()).configure(routes));
//! ```

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use actix_web::http::header::{ContentType, HeaderMap, HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::auth::algorithm::SigningAlgorithm;
use crate::auth::claims::Claims;
use crate::auth::token::{decode_token, encode_token};
use crate::clock::{Clock, SystemClock};
use crate::config::security::SecurityConfig;
use crate::config::settings::{AuthSettings, DEFAULT_AUTH_HEADER, DEFAULT_TOKEN_EXPIRATION};
use crate::error::AuthError;
use crate::errors::{ConfigError, ErrorCode, TokenError};
use crate::extractors::authenticated::Authenticated;
use crate::middleware::jwt_auth::JwtAuthentication;
use crate::resolver::{IdentityResolver, TokenStore};

const BEARER_PREFIX: &str = "Bearer ";

/// Immutable auth configuration shared by every request.
///
/// Cloning is cheap; all clones share the same configuration.
pub struct JwtAuth<U> {
    inner: Arc<Inner<U>>,
}

struct Inner<U> {
    security: SecurityConfig,
    auth_header: HeaderName,
    default_token_expiration: Duration,
    resolver: Arc<dyn IdentityResolver<Identity = U>>,
    token_store: Option<Arc<dyn TokenStore>>,
    exclude: Vec<String>,
    clock: Arc<dyn Clock>,
}

impl<U> Clone for JwtAuth<U> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<U> std::fmt::Debug for JwtAuth<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuth")
            .field("security", &self.inner.security)
            .field("auth_header", &self.inner.auth_header)
            .field("default_token_expiration", &self.inner.default_token_expiration)
            .field("exclude", &self.inner.exclude)
            .finish_non_exhaustive()
    }
}

impl<U> JwtAuth<U>
where
    U: Clone + Send + Sync + 'static,
{
    pub fn builder<R>(resolver: R) -> JwtAuthBuilder<U>
    where
        R: IdentityResolver<Identity = U>,
    {
        JwtAuthBuilder::new(Arc::new(resolver))
    }

    /// Builder pre-populated from [`AuthSettings`].
    pub fn from_settings<R>(settings: &AuthSettings, resolver: R) -> JwtAuthBuilder<U>
    where
        R: IdentityResolver<Identity = U>,
    {
        let mut builder = Self::builder(resolver)
            .token_secret(settings.token_secret.clone())
            .signing_algorithm(settings.algorithm)
            .auth_header(settings.auth_header.clone())
            .default_token_expiration(settings.default_token_expiration);
        for prefix in &settings.exclude {
            builder = builder.exclude(prefix.clone());
        }
        builder
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.inner.security
    }

    pub fn auth_header(&self) -> &HeaderName {
        &self.inner.auth_header
    }

    pub fn default_token_expiration(&self) -> Duration {
        self.inner.default_token_expiration
    }

    pub fn now(&self) -> SystemTime {
        self.inner.clock.now()
    }

    /// Middleware that authenticates every request in the wrapped scope.
    pub fn middleware(&self) -> JwtAuthentication<U> {
        JwtAuthentication::new(self.clone())
    }

    /// True when `path` is an excluded prefix or lies below one.
    ///
    /// Matching stops at segment boundaries: excluding `/api/health` covers
    /// `/api/health` and `/api/health/live`, not `/api/healthz`.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.inner.exclude.iter().any(|prefix| {
            let prefix = prefix.trim_end_matches('/');
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Read the token from the configured header.
    ///
    /// A leading `Bearer ` scheme is stripped; otherwise the header value is
    /// the token verbatim.
    pub fn credentials(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let value = headers
            .get(&self.inner.auth_header)
            .ok_or(AuthError::MissingCredentials)?;
        let value = value
            .to_str()
            .map_err(|_| TokenError::malformed("auth header is not valid UTF-8"))?
            .trim();
        let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim();
        if token.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Ok(token.to_string())
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        decode_token(token, self.now(), &self.inner.security)
    }

    /// Validate `token` and resolve its subject.
    ///
    /// The resolver call is the only suspension point.
    pub async fn authenticate_token(&self, token: &str) -> Result<Authenticated<U>, AuthError> {
        let claims = self.decode(token).map_err(|e| self.rejected(e.into()))?;

        let identity = match self.inner.resolver.resolve(&claims.sub).await {
            Ok(Some(identity)) => identity,
            Ok(None) => return Err(self.rejected(AuthError::UnknownSubject)),
            Err(e) => {
                error!(code = %ErrorCode::ResolverFailure, error = %e, "identity resolver failed");
                return Err(e.into());
            }
        };

        debug!("request authenticated");
        Ok(Authenticated::new(identity, claims))
    }

    /// Full decision procedure for a request: extract, decode, resolve.
    pub async fn authenticate(&self, req: &HttpRequest) -> Result<Authenticated<U>, AuthError> {
        let token = self
            .credentials(req.headers())
            .map_err(|e| self.rejected(e))?;
        self.authenticate_token(&token).await
    }

    fn rejected(&self, err: AuthError) -> AuthError {
        warn!(code = %err.code(), error = %err, "authentication rejected");
        err
    }

    /// Mint a token for `identifier` without building a response.
    pub fn create_token(
        &self,
        identifier: impl Display,
        options: &TokenOptions,
    ) -> Result<String, AuthError> {
        let (token, _) = self.mint(identifier.to_string(), options)?;
        Ok(token)
    }

    fn mint(&self, identifier: String, options: &TokenOptions) -> Result<(String, Claims), AuthError> {
        let now = self.now();
        let ttl = options
            .expiration
            .unwrap_or(self.inner.default_token_expiration);
        // exp has whole-second resolution
        if ttl < Duration::from_secs(1) {
            return Err(ConfigError::InvalidExpiration.into());
        }

        let mut claims = Claims::expiring_in(identifier, now, ttl);
        claims.iss = options.issuer.clone();
        claims.aud = options.audience.clone();
        claims.jti = options.unique_jwt_id.clone();
        for (name, value) in &options.extra {
            claims.insert_extra(name.clone(), value.clone())?;
        }

        let token = encode_token(&claims, now, &self.inner.security)?;
        Ok((token, claims))
    }

    /// Start a login response for `identifier`.
    pub fn login(&self, identifier: impl Display) -> Login<'_, U> {
        Login {
            auth: self,
            identifier: identifier.to_string(),
            status: StatusCode::CREATED,
            content_type: None,
            options: TokenOptions::default(),
        }
    }
}

/// Per-call overrides for minted tokens. Unset claims are omitted.
#[derive(Debug, Clone, Default)]
pub struct TokenOptions {
    /// Overrides the default lifetime; at least one second.
    pub expiration: Option<Duration>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub unique_jwt_id: Option<String>,
    pub extra: BTreeMap<String, Value>,
}

/// Login response under construction. See [`JwtAuth::login`].
pub struct Login<'a, U> {
    auth: &'a JwtAuth<U>,
    identifier: String,
    status: StatusCode,
    content_type: Option<ContentType>,
    options: TokenOptions,
}

impl<U> Login<'_, U>
where
    U: Clone + Send + Sync + 'static,
{
    /// Response status; must be 2xx. Defaults to `201 Created`.
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Media type of the response body.
    ///
    /// Applies to [`Login::body`]. [`Login::json`] keeps it only when it is a
    /// JSON type (e.g. `application/problem+json`) and otherwise sends
    /// `application/json`.
    pub fn content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Token lifetime; at least one second.
    pub fn expiration(mut self, expiration: Duration) -> Self {
        self.options.expiration = Some(expiration);
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.options.issuer = Some(issuer.into());
        self
    }

    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.options.audience = Some(audience.into());
        self
    }

    pub fn unique_jwt_id(mut self, jti: impl Into<String>) -> Self {
        self.options.unique_jwt_id = Some(jti.into());
        self
    }

    pub fn extra_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.extra.insert(name.into(), value.into());
        self
    }

    pub fn options(mut self, options: TokenOptions) -> Self {
        self.options = options;
        self
    }

    /// Respond with `body` serialized as JSON.
    pub async fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<HttpResponse, AuthError> {
        let body =
            serde_json::to_vec(body).map_err(|e| AuthError::ResponseBody(e.to_string()))?;
        let content_type = self
            .content_type
            .take()
            .filter(is_json)
            .unwrap_or_else(ContentType::json);
        self.finish(Some((content_type, body.into()))).await
    }

    /// Respond with a raw body, sent as-is with the configured media type
    /// (`application/octet-stream` when none is set).
    pub async fn body(mut self, body: impl Into<Bytes>) -> Result<HttpResponse, AuthError> {
        let content_type = self
            .content_type
            .take()
            .unwrap_or_else(ContentType::octet_stream);
        self.finish(Some((content_type, body.into()))).await
    }

    /// Respond without a body.
    pub async fn send(self) -> Result<HttpResponse, AuthError> {
        self.finish(None).await
    }

    async fn finish(self, body: Option<(ContentType, Bytes)>) -> Result<HttpResponse, AuthError> {
        if !self.status.is_success() {
            return Err(ConfigError::InvalidLoginStatus(self.status.as_u16()).into());
        }

        let (token, claims) = self.auth.mint(self.identifier, &self.options)?;
        if let Some(store) = &self.auth.inner.token_store {
            store.store(&claims).await.map_err(|e| {
                error!(code = %ErrorCode::TokenStoreFailure, error = %e, "token store failed");
                AuthError::from(e)
            })?;
        }

        let header_value = HeaderValue::from_str(&token)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        let mut builder = HttpResponse::build(self.status);
        builder.insert_header((self.auth.inner.auth_header.clone(), header_value));
        Ok(match body {
            Some((content_type, body)) => builder.insert_header(content_type).body(body),
            None => builder.finish(),
        })
    }
}

fn is_json(content_type: &ContentType) -> bool {
    let mime = &content_type.0;
    mime.subtype() == "json" || mime.suffix().is_some_and(|suffix| suffix == "json")
}

/// Builder for [`JwtAuth`]. Validation happens in [`JwtAuthBuilder::build`].
pub struct JwtAuthBuilder<U> {
    resolver: Arc<dyn IdentityResolver<Identity = U>>,
    algorithm: Result<SigningAlgorithm, ConfigError>,
    auth_header: String,
    default_token_expiration: Duration,
    token_secret: Option<String>,
    token_store: Option<Arc<dyn TokenStore>>,
    exclude: Vec<String>,
    clock: Arc<dyn Clock>,
}

impl<U> JwtAuthBuilder<U>
where
    U: Clone + Send + Sync + 'static,
{
    fn new(resolver: Arc<dyn IdentityResolver<Identity = U>>) -> Self {
        Self {
            resolver,
            algorithm: Ok(SigningAlgorithm::default()),
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            default_token_expiration: DEFAULT_TOKEN_EXPIRATION,
            token_secret: None,
            token_store: None,
            exclude: Vec::new(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Algorithm by name (`HS256`, `HS384` or `HS512`).
    pub fn algorithm(mut self, algorithm: impl AsRef<str>) -> Self {
        self.algorithm = algorithm.as_ref().parse();
        self
    }

    pub fn signing_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = Ok(algorithm);
        self
    }

    /// Header carrying the token, e.g. `Authorization` or `X-API-Key`.
    pub fn auth_header(mut self, name: impl Into<String>) -> Self {
        self.auth_header = name.into();
        self
    }

    pub fn default_token_expiration(mut self, expiration: Duration) -> Self {
        self.default_token_expiration = expiration;
        self
    }

    pub fn token_secret(mut self, secret: impl Into<String>) -> Self {
        self.token_secret = Some(secret.into());
        self
    }

    pub fn token_store<S: TokenStore>(mut self, store: S) -> Self {
        self.token_store = Some(Arc::new(store));
        self
    }

    /// Skip authentication for request paths starting with `prefix`.
    pub fn exclude(mut self, prefix: impl Into<String>) -> Self {
        self.exclude.push(prefix.into());
        self
    }

    pub fn clock<C: Clock>(mut self, clock: Arc<C>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<JwtAuth<U>, ConfigError> {
        let algorithm = self.algorithm?;
        let secret = self.token_secret.ok_or(ConfigError::MissingSecret)?;
        let security = SecurityConfig::new(secret, algorithm)?;

        let auth_header = HeaderName::from_bytes(self.auth_header.as_bytes())
            .map_err(|_| ConfigError::InvalidHeaderName(self.auth_header.clone()))?;

        if self.default_token_expiration < Duration::from_secs(1) {
            return Err(ConfigError::InvalidExpiration);
        }

        Ok(JwtAuth {
            inner: Arc::new(Inner {
                security,
                auth_header,
                default_token_expiration: self.default_token_expiration,
                resolver: self.resolver,
                token_store: self.token_store,
                exclude: self.exclude,
                clock: self.clock,
            }),
        })
    }
}
