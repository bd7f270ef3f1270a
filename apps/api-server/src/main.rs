//! # Yatube API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, middleware::NormalizePath};
use tracing_actix_web::TracingLogger;

use api_server::config::AppConfig;
use api_server::observability::RequestIdMiddleware;
use api_server::state::AppState;
use api_server::telemetry::{TelemetryConfig, init_telemetry};

#[cfg(feature = "rate-limit")]
use api_server::middleware::rate_limit::RateLimitMiddleware;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    // Load configuration
    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Yatube API Server on {}:{}",
        config.host,
        config.port
    );

    // Build application state
    let state = AppState::new(&config).await;
    tracing::info!(storage = state.backend.as_str(), "Storage backend ready");

    #[cfg(feature = "rate-limit")]
    let limiter: std::sync::Arc<dyn yatube_core::ports::RateLimiter> = std::sync::Arc::new(
        yatube_infra::InMemoryRateLimiter::new(config.rate_limit.clone()),
    );

    // Start HTTP server
    HttpServer::new(move || {
        let state = state.clone();
        let app = App::new()
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .configure(|cfg| api_server::configure_app(cfg, state));

        #[cfg(feature = "rate-limit")]
        let app = app.wrap(RateLimitMiddleware::new(limiter.clone()));

        app
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
