mod metrics;
mod record;
mod repository;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr, Operation, Resource};

// Publicly expose the record store abstractions
pub use record::{Fields, Record};
pub use repository::{Repository, RepositoryPtr};
