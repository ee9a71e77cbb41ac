// src/lib.rs
use anyhow::Result;
use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use crate::handlers::{
    create_customer, create_product, fallback_handler, get_customer, get_product, health_check,
    list_customers, list_products, metrics_handler, root_handler,
};
use crate::middleware::{catch_panic_layer, track_request_duration};

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;
mod middleware;

// Hoist up only the public symbol(s)
pub use app_state::AppState;
pub use config::*;
pub use handlers::{ApiError, ErrorResponse};

// Publicly expose the infrastructure creation functions and the registry
pub use infrastructure::metrics::prometheus::{
    InstrumentKind, InstrumentSpec, MetricsError, MetricsRegistry, PrometheusMetrics,
};
pub use infrastructure::{create_memory_repository, create_prom_metrics};

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once.
pub fn init_tracing() {
    // ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok(); // Ignores if already initialized
}

/// Build the HTTP router with fresh in-memory stores and a fresh metrics registry.
pub fn create_router() -> Result<Router> {
    // ---
    Ok(build_router(AppState::in_memory()?))
}

/// Build the HTTP router around existing state.
///
/// Every request, including unmatched ones and CORS preflights, passes
/// through the timing middleware. Panics are caught inside the CORS layer.
pub fn build_router(app_state: AppState) -> Router {
    // ---
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/customers", get(list_customers).post(create_customer))
        .route("/customers/{id}", get(get_customer))
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", get(get_product))
        .fallback(fallback_handler)
        .layer(catch_panic_layer())
        .layer(CorsLayer::permissive())
        .layer(from_fn_with_state(app_state.clone(), track_request_duration))
        .with_state(app_state)
}
