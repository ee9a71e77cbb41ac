//! Request timing middleware.
//!
//! Wraps every request that reaches the router, matched or not, and
//! records its duration into `http_request_duration_ms` once the status
//! code is final. Panics are already answered by the catch-panic layer
//! further in, so each request is observed exactly once.
//!
//! If the client goes away before the response is produced, the server
//! drops this future and nothing is recorded.

use super::HandlerPanicked;
use crate::app_state::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// Middleware to record HTTP request metrics.
///
/// The histogram's `route` label is the raw request path. A panic is
/// counted in `api_errors_total` under the matched route pattern, the same
/// label handler failures use; unmatched requests fall back to the raw path.
pub async fn track_request_duration(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    // ---
    let start = Instant::now();
    let method = req.method().clone();
    let route = req.uri().path().to_owned();
    let pattern = req
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned());

    let response = next.run(req).await;

    if response.extensions().get::<HandlerPanicked>().is_some() {
        let error_route = pattern.as_deref().unwrap_or(&route);
        state.metrics().record_error(error_route, method.as_str());
    }

    let status = response.status().as_u16();
    state
        .metrics()
        .record_http_request(start, &route, method.as_str(), status);

    response
}
