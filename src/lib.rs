pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::convert::ConvertArgs;
use crate::core::cache::Store;
use crate::core::config::{API_KEY_ENV, AppConfig};
use crate::core::preferences::{PreferenceStore, detect_locale};
use crate::core::{FetchStatus, RateProvider, Session};
use crate::providers::caching::CachingRateProvider;
use crate::providers::exchangerate_api::ExchangeRateApiProvider;
use crate::store::KeyValueStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

const PREFERENCES_COLLECTION: &str = "preferences";
const RATES_COLLECTION: &str = "rates";

pub enum AppCommand {
    Rates { search: Option<String> },
    Convert(ConvertArgs),
    Favorite { code: String },
    Base { code: Option<String> },
}

/// Builds a session from `config`, persisting preferences and cached rates in
/// `store`.
pub fn build_session(config: &AppConfig, store: &dyn Store, locale: &str) -> Result<Session> {
    let preferences = PreferenceStore::load(store.collection(PREFERENCES_COLLECTION)?, locale);

    let api = config.exchangerate_api(std::env::var(API_KEY_ENV).ok());
    let provider: Arc<dyn RateProvider> = Arc::new(CachingRateProvider::new(
        ExchangeRateApiProvider::new(&api.base_url, &api.api_key),
        store.collection(RATES_COLLECTION)?,
        config.cache_ttl(),
    ));

    Ok(Session::new(preferences, provider))
}

async fn load_rates(session: &mut Session) -> FetchStatus {
    let pb = cli::ui::new_spinner("Loading exchange rates");
    let status = session.start().await;
    pb.finish_and_clear();
    status
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = KeyValueStore::open_or_memory(&config.data_path()?);
    let mut session = build_session(&config, &store, &detect_locale())?;

    match command {
        AppCommand::Rates { search } => {
            load_rates(&mut session).await;
            cli::rates::run(&session, search.as_deref())
        }
        AppCommand::Convert(args) => {
            load_rates(&mut session).await;
            cli::convert::run(&session, &args)
        }
        AppCommand::Favorite { code } => cli::preferences::toggle_favorite(&mut session, &code),
        AppCommand::Base { code } => {
            cli::preferences::base_currency(&mut session, code.as_deref()).await
        }
    }
}
