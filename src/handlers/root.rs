use crate::handlers::shared_types::ApiError;
use axum::{http::Uri, Json};
use serde_json::{json, Value};

/// Endpoint directory (GET /).
pub async fn root_handler() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");
    Json(json!({
        "message": "Customers & Products API with Prometheus metrics",
        "version": version,
        "endpoints": {
            "customers": {
                "getAll": "GET /customers",
                "create": "POST /customers",
                "getById": "GET /customers/{id}"
            },
            "products": {
                "getAll": "GET /products",
                "create": "POST /products",
                "getById": "GET /products/{id}"
            },
            "health": "GET /health",
            "metrics": "GET /metrics"
        }
    }))
}

/// Fallback for paths no route matches.
pub async fn fallback_handler(uri: Uri) -> ApiError {
    tracing::debug!(path = uri.path(), "No route matched");
    ApiError::NotFound("Route")
}
