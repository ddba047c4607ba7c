//! Assertions for Problem Details error responses.
//!
//! Parses bodies into a local mirror of the wire shape so the helpers do not
//! depend on jwt-auth types.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderMap, CONTENT_TYPE, WWW_AUTHENTICATE};
use actix_web::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

impl ProblemDetailsLike {
    /// Body with the per-request trace id blanked, for comparing rejections.
    pub fn without_trace_id(mut self) -> Self {
        self.trace_id.clear();
        self
    }
}

/// Check status, content type, trace id parity and code, then return the body.
pub fn assert_problem_details_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status);

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(content_type, "application/problem+json");

    let problem: ProblemDetailsLike = serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "body is not Problem Details JSON ({e}): {}",
            String::from_utf8_lossy(body)
        )
    });

    let trace_id = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert_eq!(
        problem.trace_id, trace_id,
        "trace_id in body should match x-trace-id header"
    );

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());
    problem
}

pub async fn assert_problem_details<B>(
    resp: ServiceResponse<B>,
    expected_code: &str,
    expected_status: StatusCode,
) -> ProblemDetailsLike
where
    B: MessageBody,
{
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_problem_details_from_parts(status, &headers, &body, expected_code, expected_status)
}

/// Opaque 401 with a bearer challenge and no token-derived detail.
pub async fn assert_unauthorized<B>(resp: ServiceResponse<B>) -> ProblemDetailsLike
where
    B: MessageBody,
{
    let challenge = resp
        .headers()
        .get(WWW_AUTHENTICATE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    assert_eq!(challenge.as_deref(), Some("Bearer"));

    let problem = assert_problem_details(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED).await;
    assert_eq!(problem.detail, "Authentication required");
    problem
}
