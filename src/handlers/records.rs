//! Shared implementation of the list / create / get-by-id handlers.
//!
//! Every outcome is counted: a success bumps the resource's operation
//! counter, a failure bumps `api_errors_total{route, method}`. Both happen
//! before the response leaves the handler.

use crate::app_state::AppState;
use crate::domain::{Fields, Operation, Record, Resource};
use crate::handlers::shared_types::ApiError;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        MatchedPath, Path,
    },
    http::{Method, StatusCode},
    Json,
};

/// Route pattern and method of the request being handled.
pub(crate) struct Endpoint<'a> {
    // ---
    pub route: &'a MatchedPath,
    pub method: &'a Method,
}

fn finish<T>(
    state: &AppState,
    resource: Resource,
    operation: Operation,
    endpoint: &Endpoint<'_>,
    result: Result<T, ApiError>,
) -> Result<T, ApiError> {
    // ---
    match &result {
        Ok(_) => state.metrics().record_operation(resource, operation),
        Err(err) => {
            match err {
                ApiError::Internal(source) => {
                    tracing::error!(route = endpoint.route.as_str(), error = ?source, "Request failed");
                }
                _ => tracing::warn!(route = endpoint.route.as_str(), %err, "Request rejected"),
            }
            state
                .metrics()
                .record_error(endpoint.route.as_str(), endpoint.method.as_str());
        }
    }
    result
}

/// Returns every record of `resource` in insertion order.
pub(crate) async fn list(
    state: &AppState,
    resource: Resource,
    endpoint: Endpoint<'_>,
) -> Result<Json<Vec<Record>>, ApiError> {
    // ---
    let result = state
        .repository(resource)
        .list()
        .await
        .map(Json)
        .map_err(ApiError::from);

    finish(state, resource, Operation::GetAll, &endpoint, result)
}

/// Stores the posted object and returns it with `id` and `createdAt`.
///
/// A body sent without a JSON content type is treated as an empty object.
pub(crate) async fn create(
    state: &AppState,
    resource: Resource,
    endpoint: Endpoint<'_>,
    payload: Result<Json<Fields>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    // ---
    let result = match payload {
        Ok(Json(fields)) => Ok(fields),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Fields::new()),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    };

    let result = match result {
        Ok(fields) => state
            .repository(resource)
            .create(fields)
            .await
            .map(|record| {
                tracing::info!(id = record.id, resource = resource.display_name(), "Record created");
                (StatusCode::CREATED, Json(record))
            })
            .map_err(ApiError::from),
        Err(err) => Err(err),
    };

    finish(state, resource, Operation::Create, &endpoint, result)
}

/// Looks a record up by the raw `id` path segment.
///
/// Anything that does not parse as a positive integer is a miss, including
/// a segment the router could not decode.
pub(crate) async fn get_by_id(
    state: &AppState,
    resource: Resource,
    endpoint: Endpoint<'_>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Record>, ApiError> {
    // ---
    let parsed = match &id {
        Ok(Path(raw)) => raw.parse::<u64>().ok(),
        Err(rejection) => {
            tracing::debug!(%rejection, "Undecodable id segment");
            None
        }
    };

    let result = match parsed {
        Some(id) => match state.repository(resource).get(id).await {
            Ok(Some(record)) => Ok(Json(record)),
            Ok(None) => Err(ApiError::NotFound(resource.display_name())),
            Err(err) => Err(ApiError::from(err)),
        },
        None => Err(ApiError::NotFound(resource.display_name())),
    };

    finish(state, resource, Operation::GetById, &endpoint, result)
}
