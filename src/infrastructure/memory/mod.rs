mod memory_repository;


pub use memory_repository::InMemoryRepository;
use std::sync::Arc;

/// Creates a new, empty in-memory record store.
///
/// All data lives for the lifetime of the returned pointer and is lost
/// on restart.
pub fn create() -> anyhow::Result<crate::domain::RepositoryPtr> {
    Ok(Arc::new(InMemoryRepository::new()))
}
