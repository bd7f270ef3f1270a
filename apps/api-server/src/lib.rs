//! # Yatube API Server
//!
//! Actix-web transport for the Yatube services: routing, extractors,
//! error mapping and middleware. The binary in `main.rs` wires it to a
//! listener; tests build the same app against the in-memory store.

use actix_web::web;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use middleware::error::{json_error_handler, path_error_handler};
use state::AppState;

/// Register shared state, extractor error handlers and every route.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: AppState) {
    cfg.app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .configure(handlers::configure_routes);
}
