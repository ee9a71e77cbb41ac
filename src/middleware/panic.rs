//! Turns a panicking handler into a JSON `500`.
//!
//! The layer sits inside the CORS layer so the `500` carries the same
//! headers as any other error. The response is tagged with
//! [`HandlerPanicked`] so the timing middleware can count it as an error.

use crate::handlers::ApiError;
use axum::{
    body::Body,
    http,
    response::IntoResponse,
};
use std::any::Any;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};

/// Response extension marking a `500` produced from a panic.
#[derive(Debug, Clone, Copy)]
pub struct HandlerPanicked;

/// Builds the `500` body from the panic payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicResponse;

impl ResponseForPanic for PanicResponse {
    type ResponseBody = Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> http::Response<Self::ResponseBody> {
        // ---
        let message = panic_message(err.as_ref());
        tracing::error!(%message, "Handler panicked");

        let mut response = ApiError::Internal(anyhow::anyhow!(message)).into_response();
        response.extensions_mut().insert(HandlerPanicked);
        response
    }
}

/// Layer catching panics from every route it wraps.
pub fn catch_panic_layer() -> CatchPanicLayer<PanicResponse> {
    CatchPanicLayer::custom(PanicResponse)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    // ---
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
