//! Alpha Vantage client contract tests
//!
//! Cover the query format and every payload shape the stock handler
//! has to turn into a reply.

use finance_advisor::error::MarketDataError;
use finance_advisor::market_data::{AlphaVantageClient, DailySeries, MarketDataClient};
use finance_advisor::parsing::Ticker;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, timeout: Duration) -> AlphaVantageClient {
    AlphaVantageClient::new("av_test", server.uri(), timeout)
        .unwrap_or_else(|e| panic!("client build failed: {e}"))
}

fn ticker(symbol: &str) -> Ticker {
    Ticker::parse(symbol).unwrap_or_else(|e| panic!("bad test ticker: {e}"))
}

#[tokio::test]
async fn test_query_format_and_latest_close() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_DAILY"))
        .and(query_param("symbol", "IBM"))
        .and(query_param("apikey", "av_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Meta Data": {
                "1. Information": "Daily Prices (open, high, low, close) and Volumes",
                "2. Symbol": "IBM"
            },
            "Time Series (Daily)": {
                "2024-01-03": {
                    "1. open": "161.0000", "2. high": "161.7300", "3. low": "160.0800",
                    "4. close": "160.1000", "5. volume": "4086133"
                },
                "2024-01-02": {
                    "1. open": "162.8300", "2. high": "163.2900", "3. low": "160.5000",
                    "4. close": "161.5000", "5. volume": "4236161"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server, Duration::from_secs(2))
        .daily_series(&ticker("IBM"))
        .await
        .unwrap_or_else(|e| panic!("Expected Ok, got Err: {e}"));

    let DailySeries::TimeSeries(series) = outcome else {
        panic!("expected a time series, got {outcome:?}");
    };
    let (date, bar) = series.latest().unwrap_or_else(|| panic!("empty series"));
    assert_eq!(date.to_string(), "2024-01-03");
    assert_eq!(bar.close, "160.1000");
    assert_eq!(bar.volume.as_deref(), Some("4086133"));
}

#[tokio::test]
async fn test_error_message_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Error Message": "Invalid API call. Please retry or visit the documentation (https://www.alphavantage.co/documentation/) for TIME_SERIES_DAILY."
        })))
        .mount(&server)
        .await;

    let outcome = client(&server, Duration::from_secs(2))
        .daily_series(&ticker("ZZZZZ"))
        .await;
    assert!(matches!(
        outcome,
        Ok(DailySeries::ProviderError(ref m)) if m.starts_with("Invalid API call")
    ));
}

#[tokio::test]
async fn test_rate_limit_note_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."
        })))
        .mount(&server)
        .await;

    let outcome = client(&server, Duration::from_secs(2))
        .daily_series(&ticker("IBM"))
        .await;
    assert_eq!(outcome, Ok(DailySeries::RateLimited));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let outcome = client(&server, Duration::from_secs(2))
        .daily_series(&ticker("IBM"))
        .await;
    assert_eq!(outcome, Ok(DailySeries::Malformed));
}

#[tokio::test]
async fn test_http_error_status_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let outcome = client(&server, Duration::from_secs(2))
        .daily_series(&ticker("IBM"))
        .await;
    assert!(matches!(outcome, Err(MarketDataError::Transport(ref m)) if m.contains("502")));
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let outcome = client(&server, Duration::from_secs(1))
        .daily_series(&ticker("IBM"))
        .await;
    assert_eq!(outcome, Err(MarketDataError::Timeout(1)));
}
