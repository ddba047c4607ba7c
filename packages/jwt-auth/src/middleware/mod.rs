pub mod jwt_auth;
pub mod request_trace;

pub use jwt_auth::{JwtAuthentication, JwtAuthenticationMiddleware};
pub use request_trace::{RequestTrace, RequestTraceMiddleware};
