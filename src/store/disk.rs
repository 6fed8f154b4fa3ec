use crate::core::cache::KeyValueCollection;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionHandle, PersistMode};
use std::sync::Arc;
use tracing::debug;

/// A collection backed by a fjall partition. Writes are synced to disk before
/// `put` and `remove` return.
pub struct DiskCollection {
    keyspace: Arc<Keyspace>,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(keyspace: Arc<Keyspace>, partition: PartitionHandle) -> Self {
        Self {
            keyspace,
            partition,
        }
    }

    fn sync(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to persist keyspace")
    }
}

impl KeyValueCollection for DiskCollection {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .partition
            .get(key)
            .with_context(|| format!("Failed to read key: {key}"))?;
        debug!(key, hit = value.is_some(), "Disk GET");
        value
            .map(|bytes| String::from_utf8(bytes.to_vec()).context("Stored value is not UTF-8"))
            .transpose()
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.partition
            .insert(key, value)
            .with_context(|| format!("Failed to write key: {key}"))?;
        debug!(key, "Disk PUT");
        self.sync()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.partition
            .remove(key)
            .with_context(|| format!("Failed to remove key: {key}"))?;
        debug!(key, "Disk REMOVE");
        self.sync()
    }
}
