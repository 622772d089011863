//! Market data abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One daily price observation for a single asset, in USD.
///
/// Series are ordered ascending by timestamp, one point per UTC day, and are
/// immutable once fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp_millis: i64,
    pub usd_price: f64,
}

/// A tradeable asset in the provider's ranked snapshot.
///
/// `id` is the stable key used for all lookups; `symbol` is display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price_usd: f64,
}

impl Asset {
    /// Upper-cased symbol for presentation.
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Snapshot of current spot prices, ranked by market cap.
    async fn list_assets(&self) -> Result<Vec<Asset>>;

    /// Daily USD price series for one asset over the trailing window.
    async fn fetch_daily_series(&self, asset_id: &str, days: u32) -> Result<Vec<PricePoint>>;
}
