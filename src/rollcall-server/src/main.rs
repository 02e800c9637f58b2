use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use rollcall_core::{Config, RecordStore};
use rollcall_server::{api, telemetry};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> Result<()> {
    let config_path = std::env::var("ROLLCALL_CONFIG").unwrap_or_else(|_| "config.json".to_string());

    // Load configuration before logging so the log settings can come from it
    let (config, config_error) = match Config::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Initialize tracing with file output
    let _guard = telemetry::init_telemetry(&config.logging)?;

    if let Some(e) = config_error {
        tracing::warn!("Failed to load {}, using defaults: {}", config_path, e);
    }

    tracing::info!("rollcall starting");
    tracing::info!("  Dataset: {}", config.dataset_path);
    tracing::info!("  Bind address: {}", config.bind_addr());
    tracing::info!("  Accepted tokens: {}", config.access_tokens.len());
    tracing::info!(
        "  CORS: enabled={}, origins={:?}",
        config.cors.enabled,
        config.cors.allowed_origins
    );

    if config.access_tokens.is_empty() {
        tracing::warn!("No access tokens configured, every search will be refused");
    }

    // Load the dataset once; it is never mutated afterwards
    let store = RecordStore::load(&config.dataset_path)?;
    tracing::info!("✓ Record store initialized ({} records)", store.len());

    let app_state = web::Data::new(api::AppState::new(
        Arc::new(store),
        Arc::new(config.clone()),
    ));

    let bind_addr = config.bind_addr();
    tracing::info!("Starting HTTP server on {}", bind_addr);

    let cors_config = config.cors.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();

        if cors_config.enabled {
            for origin in &cors_config.allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            cors = cors
                .allowed_methods(vec!["GET", "OPTIONS"])
                .allowed_headers(vec![
                    actix_web::http::header::AUTHORIZATION,
                    actix_web::http::header::ACCEPT,
                ])
                .expose_headers(vec![rollcall_core::HAS_MORE_HEADER])
                .max_age(3600);
        }

        App::new()
            .app_data(app_state.clone())
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(api::configure)
    })
    .bind(&bind_addr)?
    .run();

    tracing::info!("Server running, press Ctrl+C to stop");

    server.await?;

    tracing::info!("Shutting down");

    // Guard will be dropped here, flushing remaining logs
    drop(_guard);

    Ok(())
}
