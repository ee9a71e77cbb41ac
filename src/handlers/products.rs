use crate::app_state::AppState;
use crate::domain::{Fields, Record, Resource};
use crate::handlers::records::{self, Endpoint};
use crate::handlers::shared_types::ApiError;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        MatchedPath, Path, State,
    },
    http::{Method, StatusCode},
    Json,
};

/// Handler for listing every product (GET /products).
#[tracing::instrument(skip(state, route))]
pub async fn list_products(
    State(state): State<AppState>,
    route: MatchedPath,
    method: Method,
) -> Result<Json<Vec<Record>>, ApiError> {
    // ---
    let endpoint = Endpoint { route: &route, method: &method };
    records::list(&state, Resource::Product, endpoint).await
}

/// Handler for creating a product (POST /products).
///
/// Accepts any JSON object; responds with `201 Created` and the stored
/// record, including its server-assigned `id` and `createdAt`.
#[tracing::instrument(skip(state, route, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    route: MatchedPath,
    method: Method,
    payload: Result<Json<Fields>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    // ---
    let endpoint = Endpoint { route: &route, method: &method };
    records::create(&state, Resource::Product, endpoint, payload).await
}

/// Handler for fetching a product by id (GET /products/{id}).
///
/// - If the product exists, responds with `200 OK` and the record.
/// - Otherwise, including a non-numeric or undecodable id, responds with
///   `404 Not Found`.
#[tracing::instrument(skip(state, route))]
pub async fn get_product(
    State(state): State<AppState>,
    route: MatchedPath,
    method: Method,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Record>, ApiError> {
    // ---
    let endpoint = Endpoint { route: &route, method: &method };
    records::get_by_id(&state, Resource::Product, endpoint, id).await
}
