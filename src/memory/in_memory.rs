use crate::memory::MemoryStore;
use crate::types::{MemoryRecord, Metadata, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Process-local memory store.
///
/// Used when `memory.backend = "in_memory"` and by tests. The lock is never
/// held across an await point.
#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, Vec<MemoryRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records of `owner` in insertion order
    pub fn records(&self, owner: &str) -> Vec<MemoryRecord> {
        self.records.read().get(owner).cloned().unwrap_or_default()
    }

    /// Total number of records across users
    pub fn len(&self) -> usize {
        self.records.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn append(&self, owner: &str, message: &str, metadata: Metadata) -> Result<MemoryRecord> {
        let record = MemoryRecord {
            owner: owner.to_string(),
            message: message.to_string(),
            metadata,
            created_at: Utc::now(),
        };
        self.records
            .write()
            .entry(owner.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn retrieve_recent(&self, owner: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        let records = self.records.read();
        Ok(records
            .get(owner)
            .map(|list| list.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "in_memory"
    }
}
