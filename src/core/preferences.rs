//! Persisted user preferences: base currency and favorite currencies

use super::cache::KeyValueCollection;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub const BASE_CURRENCY_KEY: &str = "baseCurrency";
pub const FAVORITE_CURRENCIES_KEY: &str = "favoriteCurrencies";

const DEFAULT_RUSSIAN_CURRENCY: &str = "RUB";
const DEFAULT_CURRENCY: &str = "USD";

/// Default base currency for a locale tag such as `ru_RU.UTF-8` or `en-US`.
pub fn default_base_currency(locale: &str) -> &'static str {
    if locale.contains("ru") {
        DEFAULT_RUSSIAN_CURRENCY
    } else {
        DEFAULT_CURRENCY
    }
}

/// Locale of the current process, taken from the usual POSIX variables.
pub fn detect_locale() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub base_currency: String,
    pub favorites: BTreeSet<String>,
}

pub struct PreferenceStore {
    preferences: Preferences,
    backend: Arc<dyn KeyValueCollection>,
}

impl PreferenceStore {
    /// Reads preferences from `backend`. Missing or unreadable values fall back
    /// to defaults; loading never fails.
    pub fn load(backend: Arc<dyn KeyValueCollection>, locale: &str) -> Self {
        let base_currency = match backend.get(BASE_CURRENCY_KEY) {
            Ok(Some(code)) if !code.is_empty() => code,
            Ok(_) => default_base_currency(locale).to_string(),
            Err(e) => {
                warn!(error = %e, "Failed to read base currency, using default");
                default_base_currency(locale).to_string()
            }
        };

        let favorites = match backend.get(FAVORITE_CURRENCIES_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<String>>(&raw)
                .map(|codes| codes.into_iter().collect())
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Malformed favorite currencies, starting empty");
                    BTreeSet::new()
                }),
            Ok(None) => BTreeSet::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read favorite currencies, starting empty");
                BTreeSet::new()
            }
        };

        debug!(base = %base_currency, favorites = ?favorites, "Loaded preferences");
        Self {
            preferences: Preferences {
                base_currency,
                favorites,
            },
            backend,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn base_currency(&self) -> &str {
        &self.preferences.base_currency
    }

    pub fn favorites(&self) -> &BTreeSet<String> {
        &self.preferences.favorites
    }

    pub fn is_favorite(&self, code: &str) -> bool {
        self.preferences.favorites.contains(code)
    }

    /// Persists `code` as the base currency. The in-memory value only changes
    /// once the write succeeded.
    pub fn set_base_currency(&mut self, code: &str) -> Result<()> {
        self.backend
            .put(BASE_CURRENCY_KEY, code)
            .context("Failed to persist base currency")?;
        self.preferences.base_currency = code.to_string();
        debug!(base = code, "Base currency changed");
        Ok(())
    }

    /// Adds `code` to the favorites if absent, removes it otherwise. Returns
    /// whether `code` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, code: &str) -> Result<bool> {
        let mut favorites = self.preferences.favorites.clone();
        let now_favorite = if favorites.remove(code) {
            false
        } else {
            favorites.insert(code.to_string());
            true
        };

        let encoded = serde_json::to_string(&favorites)?;
        self.backend
            .put(FAVORITE_CURRENCIES_KEY, &encoded)
            .context("Failed to persist favorite currencies")?;
        self.preferences.favorites = favorites;
        debug!(code, now_favorite, "Toggled favorite currency");
        Ok(now_favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryCollection;
    use anyhow::bail;

    /// Collection that reads from a memory map but rejects every write.
    struct ReadOnlyCollection(MemoryCollection);

    impl KeyValueCollection for ReadOnlyCollection {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn put(&self, _key: &str, _value: &str) -> Result<()> {
            bail!("disk full")
        }

        fn remove(&self, _key: &str) -> Result<()> {
            bail!("disk full")
        }
    }

    fn backend() -> Arc<dyn KeyValueCollection> {
        Arc::new(MemoryCollection::new())
    }

    #[test]
    fn test_locale_defaults() {
        assert_eq!(default_base_currency("ru_RU.UTF-8"), "RUB");
        assert_eq!(default_base_currency("ru-RU"), "RUB");
        assert_eq!(default_base_currency("en_US.UTF-8"), "USD");
        assert_eq!(default_base_currency(""), "USD");

        let store = PreferenceStore::load(backend(), "ru_RU.UTF-8");
        assert_eq!(store.base_currency(), "RUB");
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn test_persisted_values_win() {
        let backend = backend();
        backend.put(BASE_CURRENCY_KEY, "GBP").unwrap();
        backend
            .put(FAVORITE_CURRENCIES_KEY, r#"["EUR","JPY","EUR"]"#)
            .unwrap();

        let store = PreferenceStore::load(backend, "ru_RU");
        assert_eq!(store.base_currency(), "GBP");
        assert_eq!(store.favorites().len(), 2);
        assert!(store.is_favorite("EUR"));
        assert!(store.is_favorite("JPY"));
    }

    #[test]
    fn test_malformed_favorites_degrade_to_empty() {
        for raw in ["not json", "{\"EUR\": true}", "[1, 2]", ""] {
            let backend = backend();
            backend.put(FAVORITE_CURRENCIES_KEY, raw).unwrap();
            let store = PreferenceStore::load(backend, "en_US");
            assert!(store.favorites().is_empty(), "{raw:?} should load empty");
        }
    }

    #[test]
    fn test_toggle_twice_restores_and_persists() {
        let backend = backend();
        backend.put(FAVORITE_CURRENCIES_KEY, r#"["JPY"]"#).unwrap();
        let mut store = PreferenceStore::load(Arc::clone(&backend), "en_US");
        let original = store.favorites().clone();

        assert!(store.toggle_favorite("EUR").unwrap());
        assert_eq!(
            backend.get(FAVORITE_CURRENCIES_KEY).unwrap().as_deref(),
            Some(r#"["EUR","JPY"]"#)
        );

        assert!(!store.toggle_favorite("EUR").unwrap());
        assert_eq!(store.favorites(), &original);
        assert_eq!(
            backend.get(FAVORITE_CURRENCIES_KEY).unwrap().as_deref(),
            Some(r#"["JPY"]"#)
        );
    }

    #[test]
    fn test_set_base_currency_persists() {
        let backend = backend();
        let mut store = PreferenceStore::load(Arc::clone(&backend), "en_US");
        assert_eq!(store.base_currency(), "USD");

        store.set_base_currency("EUR").unwrap();
        assert_eq!(store.base_currency(), "EUR");

        let reloaded = PreferenceStore::load(backend, "en_US");
        assert_eq!(reloaded.base_currency(), "EUR");
    }

    #[test]
    fn test_failed_writes_leave_preferences_unchanged() {
        let memory = MemoryCollection::new();
        memory.put(FAVORITE_CURRENCIES_KEY, r#"["EUR"]"#).unwrap();
        let mut store = PreferenceStore::load(Arc::new(ReadOnlyCollection(memory)), "en_US");
        let before = store.preferences().clone();

        let err = store.set_base_currency("GBP").unwrap_err();
        assert!(format!("{err:#}").contains("disk full"));
        assert!(store.toggle_favorite("JPY").is_err());
        assert!(store.toggle_favorite("EUR").is_err());

        assert_eq!(store.preferences(), &before);
        assert_eq!(store.base_currency(), "USD");
        assert!(store.is_favorite("EUR"));
        assert!(!store.is_favorite("JPY"));
    }
}
