//! Key-value persistence abstractions

use anyhow::Result;
use std::sync::Arc;

/// A named collection of string keys and string values.
pub trait KeyValueCollection: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` and makes it durable before returning.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

pub trait Store: Send + Sync {
    /// Opens the collection `name`, creating it if needed.
    fn collection(&self, name: &str) -> Result<Arc<dyn KeyValueCollection>>;
}
