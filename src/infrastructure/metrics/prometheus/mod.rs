mod instruments;
mod prometheus_metrics;
mod registry;

pub use prometheus_metrics::PrometheusMetrics;
pub use registry::{InstrumentKind, InstrumentSpec, MetricsError, MetricsRegistry};
use std::sync::Arc;

/// Creates a new Prometheus metrics implementation.
///
/// Each call builds an independent registry, so two routers never share
/// counters. Process-level gauges are included in every render.
pub fn create() -> anyhow::Result<crate::domain::MetricsPtr> {
    tracing::info!("Initializing Prometheus metrics");
    Ok(Arc::new(PrometheusMetrics::new()?))
}
