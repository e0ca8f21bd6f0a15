use std::io;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use log::{error, info};

use crate::config::ServerConfig;
use crate::controllers::{chat_controller, logs_controller, search_controller};
use crate::error::AppError;
use crate::state::AppState;

pub async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::NotFound)
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(chat_controller::config)
        .configure(search_controller::config)
        .configure(logs_controller::config)
        .default_service(web::to(not_found));
}

pub async fn run_server(config: ServerConfig) -> io::Result<()> {
    let state = AppState::from_config(&config).map_err(|e| {
        error!("Failed to initialise server state: {:#}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;
    let state = web::Data::new(state);

    info!("Starting chat relay on http://0.0.0.0:{}", config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
