//! Prometheus metrics implementation.
//!
//! This module provides the concrete implementation of the `Metrics` trait.
//! It owns a [`MetricsRegistry`] with the service's instruments registered
//! up front, and translates domain events (an operation on a resource, a
//! failed request, a finished request) into named observations.
//!
//! Recording never fails the request that triggered it. A registry error
//! here means an instrument was declared with different labels than it is
//! recorded with, which is logged at `error` level.

use super::instruments::{self, API_ERRORS_TOTAL, HTTP_REQUEST_DURATION_MS};
use super::registry::{MetricsError, MetricsRegistry};
use crate::domain::{Metrics, Operation, Resource};
use std::time::Instant;

/// Prometheus-based metrics implementation.
pub struct PrometheusMetrics {
    // ---
    registry: MetricsRegistry,
}

impl PrometheusMetrics {
    // ---
    /// Builds a fresh registry and registers every service instrument.
    pub fn new() -> Result<Self, MetricsError> {
        // ---
        tracing::info!("Creating Prometheus metrics");
        let registry = MetricsRegistry::new()?;
        for spec in instruments::instruments() {
            registry.register(spec)?;
        }
        Ok(Self { registry })
    }
}

fn log_failure(what: &str, result: Result<(), MetricsError>) {
    // ---
    if let Err(err) = result {
        tracing::error!(error = %err, "Failed to record {what}");
    }
}

impl Metrics for PrometheusMetrics {
    // ---
    fn render(&self) -> anyhow::Result<String> {
        Ok(self.registry.render()?)
    }

    fn record_http_request(&self, start: Instant, route: &str, method: &str, status: u16) {
        // ---
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        let status = status.to_string();
        tracing::debug!(route, method, %status, elapsed_ms, "Recording HTTP request duration");

        log_failure(
            "request duration",
            self.registry.observe(
                HTTP_REQUEST_DURATION_MS,
                &[("method", method), ("route", route), ("status_code", status.as_str())],
                elapsed_ms,
            ),
        );
    }

    fn record_operation(&self, resource: Resource, operation: Operation) {
        // ---
        log_failure(
            "operation",
            self.registry.increment(
                resource.operations_metric(),
                &[("operation", operation.as_str())],
                1.0,
            ),
        );
    }

    fn record_error(&self, route: &str, method: &str) {
        // ---
        log_failure(
            "error",
            self.registry
                .increment(API_ERRORS_TOTAL, &[("route", route), ("method", method)], 1.0),
        );
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn operations_are_counted_per_resource() {
        // ---
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_operation(Resource::Customer, Operation::Create);
        metrics.record_operation(Resource::Customer, Operation::Create);
        metrics.record_operation(Resource::Product, Operation::GetAll);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"customer_operations_total{operation="create"} 2"#));
        assert!(text.contains(r#"product_operations_total{operation="get_all"} 1"#));
        assert!(!text.contains(r#"customer_operations_total{operation="get_all"}"#));
    }

    #[test]
    fn errors_are_labelled_by_route_and_method() {
        // ---
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_error("/customers/{id}", "GET");

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"api_errors_total{method="GET",route="/customers/{id}"} 1"#));
    }

    #[test]
    fn request_durations_land_in_histogram() {
        // ---
        let metrics = PrometheusMetrics::new().unwrap();
        let start = Instant::now();
        metrics.record_http_request(start, "/customers", "POST", 201);

        let text = metrics.render().unwrap();
        assert!(text.contains("# TYPE http_request_duration_ms histogram"));
        assert!(text.contains(
            r#"http_request_duration_ms_count{method="POST",route="/customers",status_code="201"} 1"#
        ));
    }
}
