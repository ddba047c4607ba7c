use actix_web::{web, HttpResponse};
use jwt_auth::{AuthError, Authenticated, JwtAuth};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::users::{User, UserDirectory};

#[derive(Deserialize)]
struct LoginRequest {
    user_id: String,
}

/// Issue a token for a known user. Passwords are out of scope for the demo.
async fn login(
    auth: web::Data<JwtAuth<User>>,
    users: web::Data<UserDirectory>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let user = users
        .get(&body.user_id)
        .await
        .ok_or(AuthError::UnknownSubject)?;

    auth.login(&user.id)
        .unique_jwt_id(Uuid::new_v4().to_string())
        .extra_claim("role", user.role.clone())
        .json(&user)
        .await
}

async fn me(auth: Authenticated<User>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "user": auth.identity(),
        "expires_at": auth.claims().exp,
    }))
}

async fn security_scheme(auth: web::Data<JwtAuth<User>>) -> HttpResponse {
    HttpResponse::Ok().json(auth.security_scheme())
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

pub fn configure(auth: JwtAuth<User>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.route("/login", web::post().to(login))
            .route("/openapi/security", web::get().to(security_scheme))
            .service(
                web::scope("/api")
                    .wrap(auth.middleware())
                    .route("/health", web::get().to(health))
                    .route("/me", web::get().to(me)),
            );
    }
}
