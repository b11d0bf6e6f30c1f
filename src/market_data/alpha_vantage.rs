//! Alpha Vantage `TIME_SERIES_DAILY` client

use super::{parse_daily_series, DailySeries, MarketDataClient};
use crate::config::AdvisorConfig;
use crate::error::MarketDataError;
use crate::parsing::Ticker;
use crate::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, warn};

pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl AlphaVantageClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        Self::new(
            config.alpha_vantage_api_key.clone(),
            config.alpha_vantage_base_url.clone(),
            config.market_data_timeout,
        )
    }

    fn map_transport(&self, symbol: &Ticker, e: reqwest::Error) -> MarketDataError {
        if e.is_timeout() {
            warn!(symbol = %symbol, "Alpha Vantage request timed out");
            MarketDataError::Timeout(self.timeout.as_secs())
        } else {
            error!(symbol = %symbol, "Alpha Vantage request failed: {}", e);
            MarketDataError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl MarketDataClient for AlphaVantageClient {
    async fn daily_series(
        &self,
        symbol: &Ticker,
    ) -> std::result::Result<DailySeries, MarketDataError> {
        let url = format!("{}/query", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.map_transport(symbol, e))?;

        let status = response.status();
        if !status.is_success() {
            error!(symbol = %symbol, %status, "Alpha Vantage returned an error status");
            return Err(MarketDataError::Transport(format!(
                "Alpha Vantage returned HTTP {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport(symbol, e))?;

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(symbol = %symbol, "Alpha Vantage body is not JSON: {}", e);
                return Ok(DailySeries::Malformed);
            }
        };

        let keys: Vec<&str> = payload
            .as_object()
            .map(|o| o.keys().map(|k| k.as_str()).collect())
            .unwrap_or_default();
        info!(symbol = %symbol, ?keys, "Alpha Vantage response received");

        Ok(parse_daily_series(&payload))
    }
}
