//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers and middleware via the `State` extractor. The `AppState`
//! owns the metrics backend and one record store per resource type.
//!
//! Nothing here is a module-level global: each router built by
//! `create_router()` gets its own stores and its own metrics registry.
//! The state is cheaply cloneable (every field is an `Arc`).

use crate::domain::{MetricsPtr, RepositoryPtr, Resource};
use crate::infrastructure::{create_memory_repository, create_prom_metrics};
use anyhow::Result;

/// Shared application state passed to all Axum handlers.
///
/// # Lifecycle
///
/// 1. Created once in `create_router()` during application startup
/// 2. Attached to the Axum router via `.with_state(app_state)`
/// 3. Cloned automatically by Axum for each incoming HTTP request
/// 4. Handlers extract via `State(state): State<AppState>`
#[derive(Clone)]
pub struct AppState {
    /// Metrics implementation shared by handlers and the timing middleware.
    metrics: MetricsPtr,

    /// Customer record store.
    customers: RepositoryPtr,

    /// Product record store.
    products: RepositoryPtr,
}

impl AppState {
    // ---

    pub fn new(metrics: MetricsPtr, customers: RepositoryPtr, products: RepositoryPtr) -> Self {
        // ---
        AppState {
            metrics,
            customers,
            products,
        }
    }

    /// Builds state with Prometheus metrics and empty in-memory stores.
    pub fn in_memory() -> Result<Self> {
        // ---
        Ok(Self::new(
            create_prom_metrics()?,
            create_memory_repository()?,
            create_memory_repository()?,
        ))
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get the record store for `resource`.
    pub(crate) fn repository(&self, resource: Resource) -> &RepositoryPtr {
        // ---
        match resource {
            Resource::Customer => &self.customers,
            Resource::Product => &self.products,
        }
    }
}
