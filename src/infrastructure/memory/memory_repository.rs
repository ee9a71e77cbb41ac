use anyhow::{anyhow, Result};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Fields, Record, Repository};

/// Append-only record store held in process memory.
///
/// The id of a new record is derived from the current length, so the
/// length read and the push happen under one write lock.
#[derive(Default)]
pub struct InMemoryRepository {
    // ---
    records: RwLock<Vec<Record>>,
}

impl InMemoryRepository {
    // ---
    pub fn new() -> Self {
        // ---
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Record>>> {
        // ---
        self.records
            .read()
            .map_err(|_| anyhow!("record store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Record>>> {
        // ---
        self.records
            .write()
            .map_err(|_| anyhow!("record store lock poisoned"))
    }
}

#[async_trait::async_trait]
impl Repository for InMemoryRepository {
    // ---
    async fn list(&self) -> Result<Vec<Record>> {
        // ---
        Ok(self.read()?.clone())
    }

    async fn create(&self, fields: Fields) -> Result<Record> {
        // ---
        let mut records = self.write()?;
        let id = records.len() as u64 + 1;
        let record = Record::new(id, fields);
        records.push(record.clone());

        tracing::debug!(id, "record stored");
        Ok(record)
    }

    async fn get(&self, id: u64) -> Result<Option<Record>> {
        // ---
        Ok(self.read()?.iter().find(|r| r.id == id).cloned())
    }
}
