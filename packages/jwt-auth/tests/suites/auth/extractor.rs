// Authenticated<U> extractor: extension reads under the middleware, guard
// mode on unwrapped routes.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use auth_test_support::problem_details::{assert_problem_details, assert_unauthorized};
use jwt_auth::{RequestTrace, TokenOptions};
use serde_json::Value;

use crate::common::app::{me, routes};
use crate::common::{alice, builder};

#[actix_web::test]
async fn test_extractor_reuses_middleware_result() {
    let users = alice();
    let auth = builder(users.clone()).build().unwrap();
    let token = auth.create_token("user-42", &TokenOptions::default()).unwrap();
    let app = test::init_service(App::new().wrap(RequestTrace).configure(routes(auth))).await;

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    // one lookup in the middleware, none in the extractor
    assert_eq!(users.lookups(), 1);
}

#[actix_web::test]
async fn test_guard_mode_authenticates_without_middleware() {
    let users = alice();
    let auth = builder(users.clone()).build().unwrap();
    let token = auth.create_token("user-42", &TokenOptions::default()).unwrap();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(auth))
            .route("/profile", web::get().to(me)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/profile")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], "user-42");

    let req = test::TestRequest::get().uri("/profile").to_request();
    assert_unauthorized(test::call_service(&app, req).await).await;
    assert_eq!(users.lookups(), 1);
}

#[actix_web::test]
async fn test_guard_mode_without_registered_auth_is_server_error() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/profile", web::get().to(me)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/profile")
        .insert_header(("Authorization", "a.b.c"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, "INTERNAL", StatusCode::INTERNAL_SERVER_ERROR).await;
}
