//! Named cache partitions.
//!
//! [`CacheStorage`] is the seam between the engine and wherever responses
//! actually live. Each partition maps a request key (path plus query) to a
//! stored [`Response`]. [`MemoryCacheStorage`] is the in-process
//! implementation used by the CLI and tests.

use super::http::Response;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cache storage unavailable: {0}")]
    Unavailable(String),
    #[error("cache partition {0:?} not found")]
    MissingPartition(String),
}

#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the partition if it does not exist yet.
    async fn open(&self, partition: &str) -> Result<(), StoreError>;

    /// Look up `key` in one partition. A missing partition is a miss.
    async fn lookup(&self, partition: &str, key: &str) -> Result<Option<Response>, StoreError>;

    /// Look up `key` across every partition, in name order.
    async fn lookup_any(&self, key: &str) -> Result<Option<Response>, StoreError>;

    /// Store `response` under `key`, creating the partition if needed.
    async fn put(&self, partition: &str, key: &str, response: Response) -> Result<(), StoreError>;

    /// Names of all existing partitions.
    async fn partitions(&self) -> Result<Vec<String>, StoreError>;

    /// Delete a partition. Returns whether it existed.
    async fn delete(&self, partition: &str) -> Result<bool, StoreError>;
}

type Partition = HashMap<String, Response>;

/// Partitions held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    partitions: Mutex<BTreeMap<String, Partition>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut BTreeMap<String, Partition>) -> T) -> T {
        let mut guard = self
            .partitions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }

    /// Number of entries in a partition, `None` if it does not exist.
    pub fn entry_count(&self, partition: &str) -> Option<usize> {
        self.with(|p| p.get(partition).map(HashMap::len))
    }

    /// Stored keys of a partition, sorted.
    pub fn keys(&self, partition: &str) -> Result<Vec<String>, StoreError> {
        self.with(|p| {
            let part = p
                .get(partition)
                .ok_or_else(|| StoreError::MissingPartition(partition.to_string()))?;
            let mut keys: Vec<String> = part.keys().cloned().collect();
            keys.sort();
            Ok(keys)
        })
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, partition: &str) -> Result<(), StoreError> {
        self.with(|p| {
            p.entry(partition.to_string()).or_default();
        });
        Ok(())
    }

    async fn lookup(&self, partition: &str, key: &str) -> Result<Option<Response>, StoreError> {
        Ok(self.with(|p| p.get(partition).and_then(|part| part.get(key)).cloned()))
    }

    async fn lookup_any(&self, key: &str) -> Result<Option<Response>, StoreError> {
        Ok(self.with(|p| p.values().find_map(|part| part.get(key)).cloned()))
    }

    async fn put(&self, partition: &str, key: &str, response: Response) -> Result<(), StoreError> {
        self.with(|p| {
            p.entry(partition.to_string())
                .or_default()
                .insert(key.to_string(), response);
        });
        Ok(())
    }

    async fn partitions(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.with(|p| p.keys().cloned().collect()))
    }

    async fn delete(&self, partition: &str) -> Result<bool, StoreError> {
        Ok(self.with(|p| p.remove(partition).is_some()))
    }
}
