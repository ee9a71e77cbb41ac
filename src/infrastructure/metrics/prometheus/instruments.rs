//! Names, help text and label sets of every custom instrument.

use super::registry::InstrumentSpec;
use crate::domain::Resource;

/// Request latency histogram, in milliseconds.
pub const HTTP_REQUEST_DURATION_MS: &str = "http_request_duration_ms";

/// Failed requests, by route pattern and method.
pub const API_ERRORS_TOTAL: &str = "api_errors_total";

/// Latency buckets (ms) for `http_request_duration_ms`.
pub const DURATION_BUCKETS_MS: [f64; 9] = [0.1, 5.0, 15.0, 50.0, 100.0, 200.0, 300.0, 400.0, 500.0];

/// All instruments registered at startup.
pub fn instruments() -> Vec<InstrumentSpec> {
    // ---
    vec![
        InstrumentSpec::histogram(
            HTTP_REQUEST_DURATION_MS,
            "Duration of HTTP requests in ms",
            &["method", "route", "status_code"],
            DURATION_BUCKETS_MS.to_vec(),
        ),
        InstrumentSpec::counter(
            Resource::Customer.operations_metric(),
            "Total number of customer operations",
            &["operation"],
        ),
        InstrumentSpec::counter(
            Resource::Product.operations_metric(),
            "Total number of product operations",
            &["operation"],
        ),
        InstrumentSpec::counter(
            API_ERRORS_TOTAL,
            "Total number of API errors",
            &["route", "method"],
        ),
    ]
}
