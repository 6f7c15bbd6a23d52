#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server binary for the crime atlas.

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use crime_atlas_database::{db, run_migrations};
use crime_atlas_geocoder::nominatim::NominatimGeocoder;
use crime_atlas_location::store::DbLocationStore;
use crime_atlas_server::{AppState, handlers};
use std::sync::Arc;
use switchy_database::Database;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Connecting to database...");
    let db_conn = db::connect_from_env()
        .await
        .expect("Failed to connect to database");

    log::info!("Running migrations...");
    run_migrations(db_conn.as_ref())
        .await
        .expect("Failed to run migrations");

    let db: Arc<dyn Database> = Arc::from(db_conn);

    let state = web::Data::new(AppState {
        store: Arc::new(DbLocationStore::new(db)),
        geocoder: Arc::new(NominatimGeocoder::from_env()),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        // A body that fails JSON extraction gets the generic fallback
        // response instead of actix's default error page.
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "Something went wrong!"
                })),
            )
            .into()
        });

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(json_config)
            .route("/", web::get().to(handlers::hello))
            .service(
                web::scope("/api/geo")
                    .route("/search", web::get().to(handlers::search))
                    .route("/addLocation", web::post().to(handlers::add_location))
                    .route("/getLocation", web::get().to(handlers::get_location))
                    .route("/awake", web::get().to(handlers::awake)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
