use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    // ---
    /// Failure text for internal errors, otherwise the status reason phrase.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

/// Errors a request handler can end with.
///
/// There are no structured error codes; clients get the status code and
/// the message text.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Id lookup miss, including ids that are not numbers.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request body could not be read as a JSON object.
    #[error("{0}")]
    BadRequest(String),

    /// Anything else that went wrong while handling the request.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    // ---
    pub fn status(&self) -> StatusCode {
        // ---
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        // Internal failures carry their text in `error` as well.
        let error = match self {
            ApiError::Internal(_) => message.clone(),
            _ => status.canonical_reason().unwrap_or("Error").to_string(),
        };
        let body = ErrorResponse { error, message };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn not_found_maps_to_404_with_message() {
        // ---
        let err = ApiError::NotFound("Customer");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Customer not found");
    }

    #[test]
    fn internal_carries_source_message() {
        // ---
        let err = ApiError::from(anyhow::anyhow!("record store lock poisoned"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "record store lock poisoned");
    }

    #[tokio::test]
    async fn response_body_has_error_and_message() {
        // ---
        let response = ApiError::NotFound("Product").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Not Found");
        assert_eq!(body.message, "Product not found");
    }

    #[tokio::test]
    async fn internal_body_error_field_is_the_failure_text() {
        // ---
        let response = ApiError::Internal(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "disk on fire");
        assert_eq!(body.message, "disk on fire");
    }
}
