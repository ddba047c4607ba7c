// Login flow through a real handler: token placement, store hook, status.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};
use async_trait::async_trait;
use auth_test_support::problem_details::assert_problem_details;
use jwt_auth::{AuthError, Claims, JwtAuth, RequestTrace, StoreError, TokenStore};
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::common::app::routes;
use crate::common::{alice, builder, User};

#[derive(Clone, Default)]
struct RecordingStore {
    seen: Arc<Mutex<Vec<Claims>>>,
}

#[async_trait]
impl TokenStore for RecordingStore {
    async fn store(&self, claims: &Claims) -> Result<(), StoreError> {
        self.seen.lock().push(claims.clone());
        Ok(())
    }
}

#[actix_web::test]
async fn test_login_token_opens_protected_scope() {
    let auth = builder(alice()).build().unwrap();
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
        .expect("token header")
        .to_str()
        .unwrap()
        .to_string();
    assert!(!token.starts_with("Bearer"));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "user_id": "user-42" }));

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_login_invokes_token_store_with_minted_claims() {
    let store = RecordingStore::default();
    let auth = builder(alice())
        .token_store(store.clone())
        .default_token_expiration(Duration::from_secs(300))
        .build()
        .unwrap();

    let resp = auth
        .login("user-42")
        .unique_jwt_id("jti-1")
        .extra_claim("role", "admin")
        .send()
        .await
        .unwrap();
    let token = resp.headers().get("Authorization").unwrap().to_str().unwrap();
    let decoded = auth.decode(token).unwrap();

    let seen = store.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], decoded);
    assert_eq!(seen[0].exp - seen[0].iat, 300);
    assert_eq!(seen[0].extra_claim("role"), Some(&json!("admin")));
}

#[actix_web::test]
async fn test_login_with_redirect_status_is_server_error() {
    async fn bad_login(auth: web::Data<JwtAuth<User>>) -> Result<HttpResponse, AuthError> {
        auth.login("user-42")
            .status(StatusCode::SEE_OTHER)
            .send()
            .await
    }

    let auth = builder(alice()).build().unwrap();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(auth))
            .route("/login", web::post().to(bad_login)),
    )
    .await;

    let req = test::TestRequest::post().uri("/login").to_request();
    let resp = test::call_service(&app, req).await;

    let problem =
        assert_problem_details(resp, "INTERNAL", StatusCode::INTERNAL_SERVER_ERROR).await;
    assert_eq!(problem.detail, "Internal server error");
}
