// Full issuance and validation cycle with a controllable clock.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use auth_test_support::problem_details::assert_unauthorized;
use jwt_auth::{ManualClock, RequestTrace, SigningAlgorithm};
use serde_json::{json, Value};

use crate::common::app::routes;
use crate::common::{alice, builder};

#[actix_web::test]
async fn test_issue_use_and_expire() {
    let clock = Arc::new(ManualClock::default());
    let auth = builder(alice())
        .algorithm("HS256")
        .auth_header("Authorization")
        .default_token_expiration(Duration::from_secs(15 * 60))
        .clock(Arc::clone(&clock))
        .build()
        .unwrap();
    assert_eq!(auth.security().algorithm(), SigningAlgorithm::HS256);

    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .configure(routes(auth.clone())),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "user_id": "user-42" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let token = resp
        .headers()
        .get("Authorization")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let claims = auth.decode(&token).unwrap();
    assert_eq!(claims.sub, "user-42");
    assert_eq!(claims.exp - claims.iat, 15 * 60);
    assert_eq!(claims.iss, None);
    assert_eq!(claims.aud, None);
    assert_eq!(claims.jti, None);

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["name"], "Alice");

    // one second short of expiry still passes
    clock.advance(Duration::from_secs(15 * 60 - 1));
    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", token.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    clock.advance(Duration::from_secs(2));
    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", token))
        .to_request();
    assert_unauthorized(test::call_service(&app, req).await).await;
}
