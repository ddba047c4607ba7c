// Middleware decision procedure: extract, decode, resolve, authorize.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use auth_test_support::problem_details::{assert_problem_details, assert_unauthorized};
use jwt_auth::{JwtAuth, ManualClock, RequestTrace, TokenOptions};
use serde_json::Value;

use crate::common::app::routes;
use crate::common::{alice, builder, InMemoryUsers, User};

fn token_for(auth: &JwtAuth<User>, sub: &str) -> String {
    auth.create_token(sub, &TokenOptions::default()).unwrap()
}

#[actix_web::test]
async fn test_valid_token_reaches_handler() {
    let users = alice();
    let auth = builder(users.clone()).build().unwrap();
    let token = token_for(&auth, "user-42");
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-trace-id").is_some());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["name"], "Alice");
    assert_eq!(body["sub"], "user-42");
    assert_eq!(users.lookups(), 1);
}

#[actix_web::test]
async fn test_bearer_prefix_is_accepted() {
    let auth = builder(alice()).build().unwrap();
    let token = token_for(&auth, "user-42");
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_missing_header_is_rejected_without_lookup() {
    let users = alice();
    let auth = builder(users.clone()).build().unwrap();
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get().uri("/api/me").to_request();
    assert_unauthorized(test::call_service(&app, req).await).await;
    assert_eq!(users.lookups(), 0);
}

#[actix_web::test]
async fn test_foreign_secret_is_rejected() {
    let auth = builder(alice()).build().unwrap();
    let other = JwtAuth::builder(alice())
        .token_secret("some-other-secret")
        .build()
        .unwrap();
    let forged = token_for(&other, "user-42");
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", forged))
        .to_request();
    assert_unauthorized(test::call_service(&app, req).await).await;
}

#[actix_web::test]
async fn test_algorithm_mismatch_is_rejected() {
    let auth = builder(alice()).algorithm("HS256").build().unwrap();
    let hs512 = builder(alice()).algorithm("HS512").build().unwrap();
    let token = token_for(&hs512, "user-42");
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", token))
        .to_request();
    assert_unauthorized(test::call_service(&app, req).await).await;
}

#[actix_web::test]
async fn test_unknown_subject_is_rejected() {
    let users = alice();
    let auth = builder(users.clone()).build().unwrap();
    let token = token_for(&auth, "user-7");
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", token))
        .to_request();
    assert_unauthorized(test::call_service(&app, req).await).await;
    assert_eq!(users.lookups(), 1);
}

#[actix_web::test]
async fn test_rejections_are_indistinguishable() {
    let clock = Arc::new(ManualClock::default());
    let auth = builder(alice())
        .default_token_expiration(Duration::from_secs(60))
        .clock(Arc::clone(&clock))
        .build()
        .unwrap();
    let expired = token_for(&auth, "user-42");
    let unknown = token_for(&auth, "user-7");
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .configure(routes(auth.clone())),
    )
    .await;
    clock.advance(Duration::from_secs(120));
    let unknown_fresh = token_for(&auth, "user-7");

    let headers: Vec<Option<String>> = vec![
        None,
        Some(String::new()),
        Some("not-a-jwt".to_string()),
        Some(format!("{expired}x")),
        Some(expired),
        Some(unknown),
        Some(unknown_fresh),
    ];

    let mut bodies = Vec::new();
    for header in headers {
        let mut req = test::TestRequest::get().uri("/api/me");
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        bodies.push(assert_unauthorized(resp).await.without_trace_id());
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[actix_web::test]
async fn test_resolver_failure_is_server_error() {
    let auth = builder(InMemoryUsers::failing()).build().unwrap();
    let token = token_for(&auth, "user-42");
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    let problem =
        assert_problem_details(resp, "INTERNAL", StatusCode::INTERNAL_SERVER_ERROR).await;
    assert!(!problem.detail.contains("cache"));
}

#[actix_web::test]
async fn test_excluded_path_bypasses_authentication() {
    let users = alice();
    let auth = builder(users.clone()).exclude("/api/health").build().unwrap();
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/me").to_request();
    assert_unauthorized(test::call_service(&app, req).await).await;
    assert_eq!(users.lookups(), 0);
}

#[actix_web::test]
async fn test_exclusion_does_not_cover_sibling_paths() {
    let auth = builder(alice()).exclude("/api/health").build().unwrap();
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get().uri("/api/healthz-admin").to_request();
    assert_unauthorized(test::call_service(&app, req).await).await;
}

#[actix_web::test]
async fn test_custom_header_is_the_only_source() {
    let auth = builder(alice()).auth_header("X-API-Key").build().unwrap();
    let token = token_for(&auth, "user-42");
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("X-API-Key", token.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", token))
        .to_request();
    assert_unauthorized(test::call_service(&app, req).await).await;
}
