use crate::core::cache::KeyValueCollection;
use crate::core::currency::RateProvider;
use crate::core::rates::RateSnapshot;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    snapshot: RateSnapshot,
    expires_at: SystemTime,
}

/// Serves rate snapshots from a key-value collection until they expire.
/// Failed fetches are never cached.
pub struct CachingRateProvider<T: RateProvider> {
    inner: T,
    collection: Arc<dyn KeyValueCollection>,
    ttl: Duration,
}

impl<T: RateProvider> CachingRateProvider<T> {
    pub fn new(inner: T, collection: Arc<dyn KeyValueCollection>, ttl: Duration) -> Self {
        Self {
            inner,
            collection,
            ttl,
        }
    }

    fn cached(&self, base: &str) -> Option<RateSnapshot> {
        let res: Result<Option<RateSnapshot>> = (|| {
            let Some(raw) = self.collection.get(base)? else {
                return Ok(None);
            };
            let entry: CacheEntry = serde_json::from_str(&raw)?;
            if SystemTime::now() > entry.expires_at {
                debug!("Cache entry expired for base: {}", base);
                self.collection.remove(base)?;
                return Ok(None);
            }
            Ok(Some(entry.snapshot))
        })();

        match res {
            Ok(value) => value,
            Err(e) => {
                debug!("Rate cache read error for {}: {}", base, e);
                None
            }
        }
    }

    fn store(&self, snapshot: &RateSnapshot) {
        let res: Result<()> = (|| {
            let entry = CacheEntry {
                snapshot: snapshot.clone(),
                expires_at: SystemTime::now() + self.ttl,
            };
            self.collection
                .put(&snapshot.base_currency, &serde_json::to_string(&entry)?)
        })();
        if let Err(e) = res {
            debug!("Rate cache write error: {}", e);
        }
    }
}

#[async_trait]
impl<T: RateProvider> RateProvider for CachingRateProvider<T> {
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot> {
        if let Some(snapshot) = self.cached(base) {
            debug!("Cache hit for rates: {}", base);
            return Ok(snapshot);
        }
        debug!("Cache miss for rates: {}", base);

        let snapshot = self.inner.fetch_rates(base).await?;
        // Keyed by the snapshot's own base so a lookup never returns a table
        // quoted against a different currency.
        if snapshot.base_currency == base {
            self.store(&snapshot);
        }
        Ok(snapshot)
    }
}
