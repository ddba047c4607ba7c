use actix_web::{web, App, HttpServer};
use jwt_auth::{AuthSettings, JwtAuth, RequestTrace};
use tracing::{error, info};

mod routes;
mod telemetry;
mod users;

use users::UserDirectory;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("BIND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = match std::env::var("BIND_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            error!("BIND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    let settings = match AuthSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "invalid auth settings");
            std::process::exit(1);
        }
    };

    let users = UserDirectory::seeded().await;
    let auth = match JwtAuth::from_settings(&settings, users.clone()).build() {
        Ok(auth) => auth,
        Err(e) => {
            error!(error = %e, "failed to build auth configuration");
            std::process::exit(1);
        }
    };

    info!(%host, port, algorithm = %auth.security().algorithm(), "starting demo server");

    let auth_data = web::Data::new(auth.clone());
    let users_data = web::Data::new(users);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .app_data(auth_data.clone())
            .app_data(users_data.clone())
            .configure(routes::configure(auth.clone()))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
