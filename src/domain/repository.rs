use super::record::{Fields, Record};
use anyhow::Result;
use std::sync::Arc;

/// Abstraction for an append-only record store.
///
/// Ids are assigned by the store as `len + 1` and are never reused.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---
    /// Return every record in insertion order.
    async fn list(&self) -> Result<Vec<Record>>;

    /// Append a record built from client-supplied fields.
    async fn create(&self, fields: Fields) -> Result<Record>;

    /// Get a record by its id.
    async fn get(&self, id: u64) -> Result<Option<Record>>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr = Arc<dyn Repository>;
