use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::cache::Cache;
use crate::core::market::{Asset, MarketDataProvider, PricePoint};
use crate::providers::util::with_retry;

const MARKETS_CACHE_KEY: &str = "coins/markets";
const REQUEST_TIMEOUT_SECS: u64 = 10;

// CoinGeckoProvider implementation for MarketDataProvider
pub struct CoinGeckoProvider {
    base_url: String,
    asset_cache: Arc<Cache<String, Vec<Asset>>>,
    series_cache: Arc<Cache<String, Vec<PricePoint>>>,
}

impl CoinGeckoProvider {
    pub fn new(
        base_url: &str,
        asset_cache: Arc<Cache<String, Vec<Asset>>>,
        series_cache: Arc<Cache<String, Vec<PricePoint>>>,
    ) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
            asset_cache,
            series_cache,
        }
    }

    fn client() -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .user_agent("xcr/1.0")
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?)
    }
}

#[derive(Deserialize, Debug)]
struct MarketItem {
    id: String,
    symbol: String,
    name: String,
    current_price: Option<f64>,
}

impl From<MarketItem> for Asset {
    fn from(item: MarketItem) -> Asset {
        Asset {
            id: item.id,
            symbol: item.symbol,
            name: item.name,
            // A freshly listed coin can report a null price; treat it as
            // "not yet priced" so conversion returns the zero result.
            current_price_usd: item.current_price.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct MarketChartResponse {
    prices: Vec<(i64, f64)>,
}

fn check_status(response: &reqwest::Response, what: &str) -> Result<()> {
    if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(anyhow!(
            "Rate limit exceeded while fetching {}. Please try again later.",
            what
        ));
    }
    if !response.status().is_success() {
        return Err(anyhow!("HTTP error: {} for {}", response.status(), what));
    }
    Ok(())
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoMarkets", skip(self))]
    async fn list_assets(&self) -> Result<Vec<Asset>> {
        if let Some(cached) = self.asset_cache.get(&MARKETS_CACHE_KEY.to_string()).await {
            return Ok(cached);
        }

        let url = format!("{}/coins/markets", self.base_url);
        debug!("Requesting asset snapshot from {}", url);

        let client = Self::client()?;
        let response = with_retry(
            || async {
                client
                    .get(&url)
                    .query(&[
                        ("vs_currency", "usd"),
                        ("order", "market_cap_desc"),
                        ("per_page", "100"),
                        ("sparkline", "false"),
                        ("locale", "en"),
                    ])
                    .send()
                    .await
            },
            3,
            500,
        )
        .await
        .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        check_status(&response, "asset snapshot")?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(anyhow!("Received empty asset snapshot response"));
        }

        let items: Vec<MarketItem> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse asset snapshot response: {}", e))?;

        let assets: Vec<Asset> = items.into_iter().map(Asset::from).collect();
        debug!("Fetched {} assets", assets.len());

        self.asset_cache
            .put(MARKETS_CACHE_KEY.to_string(), assets.clone())
            .await;

        Ok(assets)
    }

    #[instrument(
        name = "CoinGeckoChart",
        skip(self),
        fields(asset_id = %asset_id, days = days)
    )]
    async fn fetch_daily_series(&self, asset_id: &str, days: u32) -> Result<Vec<PricePoint>> {
        let cache_key = format!("{asset_id}:{days}");
        if let Some(cached) = self.series_cache.get(&cache_key).await {
            return Ok(cached);
        }

        let url = format!("{}/coins/{}/market_chart", self.base_url, asset_id);
        debug!("Requesting price history from {}", url);

        let client = Self::client()?;
        let days_param = days.to_string();
        let response = with_retry(
            || async {
                client
                    .get(&url)
                    .query(&[
                        ("vs_currency", "usd"),
                        ("days", days_param.as_str()),
                        ("interval", "daily"),
                    ])
                    .send()
                    .await
            },
            3,
            500,
        )
        .await
        .map_err(|e| anyhow!("Request error: {} for asset: {} URL: {}", e, asset_id, url))?;

        check_status(&response, asset_id)?;

        let data = response
            .json::<MarketChartResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse price history for {}: {}", asset_id, e))?;

        let series: Vec<PricePoint> = data
            .prices
            .into_iter()
            .map(|(timestamp_millis, usd_price)| PricePoint {
                timestamp_millis,
                usd_price,
            })
            .collect();

        debug!("Fetched {} price points for {}", series.len(), asset_id);

        self.series_cache.put(cache_key, series.clone()).await;

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn new_provider(base_url: &str) -> CoinGeckoProvider {
        CoinGeckoProvider::new(base_url, Arc::new(Cache::new()), Arc::new(Cache::new()))
    }

    async fn create_mock_server(request_path: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_asset_snapshot_fetch() {
        let mock_response = r#"[
            {"id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "current_price": 43250.55},
            {"id": "ethereum", "symbol": "eth", "name": "Ethereum", "current_price": 2310.07}
        ]"#;

        let mock_server = create_mock_server("/coins/markets", mock_response).await;
        let provider = new_provider(&mock_server.uri());

        let assets = provider.list_assets().await.unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].id, "bitcoin");
        assert_eq!(assets[0].display_symbol(), "BTC");
        assert_eq!(assets[0].current_price_usd, 43250.55);
        assert_eq!(assets[1].name, "Ethereum");
    }

    #[tokio::test]
    async fn test_null_price_maps_to_zero() {
        let mock_response =
            r#"[{"id": "newcoin", "symbol": "new", "name": "NewCoin", "current_price": null}]"#;

        let mock_server = create_mock_server("/coins/markets", mock_response).await;
        let provider = new_provider(&mock_server.uri());

        let assets = provider.list_assets().await.unwrap();
        assert_eq!(assets[0].current_price_usd, 0.0);
    }

    #[tokio::test]
    async fn test_successful_daily_series_fetch() {
        let mock_response = r#"{
            "prices": [
                [1704412800000, 43250.55],
                [1704499200000, 43999.01],
                [1704585600000, 42100.4]
            ],
            "market_caps": [],
            "total_volumes": []
        }"#;

        let mock_server = create_mock_server("/coins/bitcoin/market_chart", mock_response).await;
        let provider = new_provider(&mock_server.uri());

        let series = provider.fetch_daily_series("bitcoin", 30).await.unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].timestamp_millis, 1704412800000);
        assert_eq!(series[0].usd_price, 43250.55);
        assert_eq!(series[2].usd_price, 42100.4);
    }

    #[tokio::test]
    async fn test_series_fetch_is_cached() {
        let mock_response = r#"{"prices": [[1704412800000, 1.0]]}"#;
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/market_chart"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = new_provider(&mock_server.uri());
        let first = provider.fetch_daily_series("bitcoin", 30).await.unwrap();
        let second = provider.fetch_daily_series("bitcoin", 30).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_dedicated_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/markets"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let provider = new_provider(&mock_server.uri());
        let result = provider.list_assets().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Rate limit exceeded")
        );
    }

    #[tokio::test]
    async fn test_server_error_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin/market_chart"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = new_provider(&mock_server.uri());
        let result = provider.fetch_daily_series("bitcoin", 30).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for bitcoin"
        );
    }

    #[tokio::test]
    async fn test_malformed_snapshot_response() {
        let mock_response = r#"{"unexpected": "shape"}"#;
        let mock_server = create_mock_server("/coins/markets", mock_response).await;
        let provider = new_provider(&mock_server.uri());

        let result = provider.list_assets().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse asset snapshot response")
        );
    }

    #[tokio::test]
    async fn test_empty_snapshot_response() {
        let mock_server = create_mock_server("/coins/markets", "").await;
        let provider = new_provider(&mock_server.uri());

        let result = provider.list_assets().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Received empty asset snapshot response"
        );
    }
}
