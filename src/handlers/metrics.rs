use crate::app_state::AppState;
use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse};

/// Handler for the `/metrics` endpoint.
///
/// Returns every registered instrument plus the process gauges in
/// Prometheus text format for scraping. Read-only: scraping does not
/// touch any counter other than the histogram sample the timing
/// middleware records for the scrape request itself.
pub async fn metrics_handler(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, StatusCode> {
    // ---

    let metrics_text = app_state.metrics().render().map_err(|err| {
        tracing::error!("Failed to render metrics: {:?}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
        metrics_text,
    ))
}
