mod auth;
mod error;
mod routes;
mod state;

use actix_web::{App, HttpServer, middleware, web};
use salon_models::settings::ServerSettings;

pub use auth::Admin;
pub use error::ApiError;
pub use state::AppState;

/// Registers every route plus JSON error bodies for malformed input.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| ApiError::BadRequest(err.to_string()).into()),
    )
    .configure(routes::health::configure)
    .configure(routes::appointments::configure)
    .configure(routes::reviews::configure)
    .configure(routes::services::configure)
    .configure(routes::offers::configure)
    .configure(routes::webhook::configure);
}

pub async fn serve(state: web::Data<AppState>, settings: &ServerSettings) -> std::io::Result<()> {
    let address = (settings.host.as_str(), settings.port);
    log::info!("Starting HTTP server. [host = {}, port = {}]", settings.host, settings.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(address)?
    .run()
    .await
}

#[cfg(test)]
mod test_utils;
