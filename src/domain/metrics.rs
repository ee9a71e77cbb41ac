use std::sync::Arc;
use std::time::Instant;

/// Resource types served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    // ---
    Customer,
    Product,
}

impl Resource {
    // ---
    /// Singular, capitalized name used in user-facing messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Resource::Customer => "Customer",
            Resource::Product => "Product",
        }
    }

    /// Name of the per-resource operation counter.
    pub fn operations_metric(self) -> &'static str {
        match self {
            Resource::Customer => "customer_operations_total",
            Resource::Product => "product_operations_total",
        }
    }
}

/// Successful store operations counted per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    // ---
    GetAll,
    Create,
    GetById,
}

impl Operation {
    // ---
    /// Value of the `operation` label.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::GetAll => "get_all",
            Operation::Create => "create",
            Operation::GetById => "get_by_id",
        }
    }
}

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> anyhow::Result<String>;

    /// Record HTTP request duration and labels.
    fn record_http_request(&self, start: Instant, route: &str, method: &str, status: u16);

    /// Record a successful operation against a resource store.
    fn record_operation(&self, resource: Resource, operation: Operation);

    /// Record a failed request on `route`.
    fn record_error(&self, route: &str, method: &str);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
