//! Market data boundary
//!
//! Provider payloads are classified here into a closed set of shapes.
//! Transport failures stay in `MarketDataError`; everything the provider
//! actually answered becomes a `DailySeries`.

use crate::error::MarketDataError;
use crate::parsing::Ticker;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

pub mod alpha_vantage;
pub use alpha_vantage::AlphaVantageClient;

const TIME_SERIES_KEY: &str = "Time Series (Daily)";
const ERROR_KEY: &str = "Error Message";
const NOTICE_KEYS: &[&str] = &["Note", "Information"];

/// One trading day as reported by the provider. Prices are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyBar {
    #[serde(rename = "1. open", default)]
    pub open: Option<String>,
    #[serde(rename = "2. high", default)]
    pub high: Option<String>,
    #[serde(rename = "3. low", default)]
    pub low: Option<String>,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume", default)]
    pub volume: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSeries {
    bars: BTreeMap<NaiveDate, DailyBar>,
}

impl TimeSeries {
    pub fn insert(&mut self, date: NaiveDate, bar: DailyBar) {
        self.bars.insert(date, bar);
    }

    /// Most recent trading day, regardless of payload order.
    pub fn latest(&self) -> Option<(NaiveDate, &DailyBar)> {
        self.bars.iter().next_back().map(|(d, b)| (*d, b))
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Shapes a daily-series response can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DailySeries {
    TimeSeries(TimeSeries),
    ProviderError(String),
    RateLimited,
    Malformed,
}

/// Classify a decoded provider payload.
///
/// A rate-limit notice wins over every other field.
pub fn parse_daily_series(payload: &Value) -> DailySeries {
    let rate_limited = NOTICE_KEYS.iter().any(|key| {
        payload
            .get(*key)
            .and_then(Value::as_str)
            .map(|note| note.to_lowercase().contains("rate limit"))
            .unwrap_or(false)
    });
    if rate_limited {
        return DailySeries::RateLimited;
    }

    if let Some(message) = payload.get(ERROR_KEY).and_then(Value::as_str) {
        return DailySeries::ProviderError(message.to_string());
    }

    let Some(entries) = payload.get(TIME_SERIES_KEY).and_then(Value::as_object) else {
        return DailySeries::Malformed;
    };

    let mut series = TimeSeries::default();
    for (date, bar) in entries {
        let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
            debug!(date = %date, "Skipping time series entry with unparseable date");
            continue;
        };
        match serde_json::from_value::<DailyBar>(bar.clone()) {
            Ok(bar) => series.insert(date, bar),
            Err(e) => debug!(date = %date, "Skipping malformed time series entry: {}", e),
        }
    }

    if series.is_empty() {
        DailySeries::Malformed
    } else {
        DailySeries::TimeSeries(series)
    }
}

/// Daily price history lookup.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    async fn daily_series(&self, symbol: &Ticker) -> Result<DailySeries, MarketDataError>;
}

/// Fixed-answer client for development & testing.
///
/// Every call returns the same outcome; requested symbols are recorded.
pub struct StaticMarketData {
    outcome: Result<DailySeries, MarketDataError>,
    requested: Mutex<Vec<String>>,
}

impl StaticMarketData {
    pub fn new(outcome: Result<DailySeries, MarketDataError>) -> Self {
        Self {
            outcome,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MarketDataClient for StaticMarketData {
    async fn daily_series(&self, symbol: &Ticker) -> Result<DailySeries, MarketDataError> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(symbol.to_string());
        }
        self.outcome.clone()
    }
}
