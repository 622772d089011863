pub mod cli;
pub mod core;
pub mod providers;

use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::market::{Asset, PricePoint};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

/// A parsed, provider-independent command for [`run_command`].
#[derive(Debug, Clone)]
pub enum AppCommand {
    Assets,
    Convert {
        amount: f64,
        from: String,
        to: String,
    },
    Compare {
        from: String,
        to: String,
        days: Option<u32>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Crypto rate explorer starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    // Shared caches: the snapshot backs asset lookups across commands, the
    // series cache deduplicates history fetches within one invocation.
    let asset_cache = Arc::new(Cache::<String, Vec<Asset>>::new());
    let series_cache = Arc::new(Cache::<String, Vec<PricePoint>>::new());

    let base_url = config
        .providers
        .coingecko
        .as_ref()
        .map_or(DEFAULT_COINGECKO_URL, |p| &p.base_url);
    let provider = providers::coingecko::CoinGeckoProvider::new(
        base_url,
        Arc::clone(&asset_cache),
        Arc::clone(&series_cache),
    );

    match command {
        AppCommand::Assets => cli::assets::run(&provider).await,
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&provider, amount, &from, &to).await
        }
        AppCommand::Compare { from, to, days } => {
            let days = days.unwrap_or(config.history_days);
            cli::compare::run(&provider, &from, &to, days).await
        }
    }
}
