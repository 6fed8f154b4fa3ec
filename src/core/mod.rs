//! Core conversion logic and its state

pub mod cache;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod log;
pub mod preferences;
pub mod ratelist;
pub mod rates;
pub mod session;
pub mod sync;

// Re-export main types for cleaner imports
pub use conversion::convert;
pub use currency::RateProvider;
pub use preferences::{PreferenceStore, Preferences};
pub use rates::{FetchStatus, RateSnapshot, RateStore, RateTable, RateView};
pub use session::Session;
pub use sync::{ConversionPair, Side, SyncController};
