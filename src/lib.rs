#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_multipart::form::MultipartFormConfig;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::storage::LocalFileStorage;

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
mod error_conversions;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod pagination;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod storage;

#[cfg(feature = "server")]
/// Extra room on top of the CV limit for multipart framing.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Registers every API route, the health check and the JSON error handlers.
///
/// Shared by [`run`] and the route tests, which add their own app data and
/// the [`routes::not_found`] default service.
#[cfg(feature = "server")]
pub fn configure_app(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, req| routes::bad_request(err, req)),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, req| routes::bad_request(err, req)))
    .app_data(web::PathConfig::default().error_handler(|err, req| routes::bad_request(err, req)))
    .app_data(
        MultipartFormConfig::default()
            .total_limit(max_upload_bytes + MULTIPART_OVERHEAD_BYTES)
            .error_handler(routes::multipart_error),
    )
    .service(routes::health)
    .service(
        web::scope("/api")
            .configure(routes::auth::configure)
            .configure(routes::jobs::configure)
            .configure(routes::candidates::configure)
            .configure(routes::applications::configure)
            .configure(routes::interviews::configure)
            .configure(routes::notes::configure)
            .configure(routes::forms::configure)
            .configure(routes::admin::configure),
    );
}

#[cfg(feature = "server")]
fn cors(server_config: &ServerConfig) -> Cors {
    match &server_config.cors_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials(),
        None => Cors::permissive(),
    }
}

#[cfg(feature = "server")]
/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);
    let storage = LocalFileStorage::new(&server_config.upload_dir);
    let max_upload_bytes = server_config.max_upload_bytes();

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Starting pushkind-hr on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&server_config))
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .configure(|cfg| configure_app(cfg, max_upload_bytes))
            .default_service(web::to(routes::not_found))
    })
    .bind(bind_address)?
    .run()
    .await
}
