// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod customers;
mod health;
mod metrics;
mod products;
mod records;
mod root;
mod shared_types;

// Core handlers
pub use health::health_check;
pub use metrics::metrics_handler;
pub use root::{fallback_handler, root_handler};

// Resource handlers
pub use customers::{create_customer, get_customer, list_customers};
pub use products::{create_product, get_product, list_products};

pub use shared_types::{ApiError, ErrorResponse};
