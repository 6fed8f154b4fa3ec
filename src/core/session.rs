//! Wires preferences and the rate lifecycle to a rate provider

use super::currency::RateProvider;
use super::preferences::PreferenceStore;
use super::rates::{FetchStatus, FetchTicket, RateStore};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Session {
    preferences: PreferenceStore,
    rates: RateStore,
    provider: Arc<dyn RateProvider>,
}

impl Session {
    pub fn new(preferences: PreferenceStore, provider: Arc<dyn RateProvider>) -> Self {
        Self {
            preferences,
            rates: RateStore::new(),
            provider,
        }
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn rates(&self) -> &RateStore {
        &self.rates
    }

    /// Initial fetch for the preferred base currency. Goes through the lazy
    /// path, so a session that already holds a table does not fetch again.
    pub async fn start(&mut self) -> FetchStatus {
        info!(base = %self.preferences.base_currency(), "Loading exchange rates");
        self.ensure_rates().await
    }

    /// Fetches only when no rate table is known. A failure after an earlier
    /// success keeps the old table, so this never retries in a loop.
    pub async fn ensure_rates(&mut self) -> FetchStatus {
        if self.rates.table_is_empty() {
            debug!("Rate table empty, fetching");
            return self.refresh().await;
        }
        self.rates.status()
    }

    pub async fn refresh(&mut self) -> FetchStatus {
        if let Some(ticket) = self.begin_fetch() {
            self.run_fetch(ticket).await;
        }
        self.rates.status()
    }

    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let base = self.preferences.base_currency().to_string();
        self.rates.request_rates(&base)
    }

    /// Runs the provider for `ticket` and applies the outcome. Returns `false`
    /// if a newer request superseded this one.
    pub async fn run_fetch(&mut self, ticket: FetchTicket) -> bool {
        let provider = Arc::clone(&self.provider);
        let result = provider.fetch_rates(ticket.base()).await;
        self.rates.complete(ticket, result)
    }

    /// Persists the new base and invalidates rates quoted against the old one.
    /// Returns the ticket for the re-fetch that must follow. If the base cannot
    /// be persisted, both the preferences and the rates are left as they were.
    pub fn change_base_currency(&mut self, code: &str) -> Result<Option<FetchTicket>> {
        self.preferences.set_base_currency(code)?;
        self.rates.invalidate();
        Ok(self.begin_fetch())
    }

    pub async fn set_base_currency(&mut self, code: &str) -> Result<FetchStatus> {
        if let Some(ticket) = self.change_base_currency(code)? {
            self.run_fetch(ticket).await;
        }
        Ok(self.rates.status())
    }

    pub fn toggle_favorite(&mut self, code: &str) -> Result<bool> {
        self.preferences.toggle_favorite(code)
    }
}
