//! Exchange rate source abstractions

use super::rates::RateSnapshot;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the full rate table quoted against `base`.
    async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot>;
}
