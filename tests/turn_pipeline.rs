//! End-to-end turns through the production Groq and Alpha Vantage clients,
//! both pointed at local mock servers.

use finance_advisor::handlers::notices::FALLBACK_MESSAGE;
use finance_advisor::models::{CarriedMemory, Intent, Route};
use finance_advisor::session::Session;
use finance_advisor::{AdvisorConfig, FinanceAssistant};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}

async fn mock_completion(server: &MockServer, prompt_marker: &str, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains(prompt_marker))
        .respond_with(completion(content))
        .mount(server)
        .await;
}

fn assistant(llm: &MockServer, market: &MockServer) -> FinanceAssistant {
    let llm_uri = llm.uri();
    let market_uri = market.uri();
    let config = AdvisorConfig::from_lookup(|name| match name {
        "GROQ_API_KEY" => Some("gsk_test".to_string()),
        "ALPHA_VANTAGE_API_KEY" => Some("av_test".to_string()),
        "GROQ_BASE_URL" => Some(llm_uri.clone()),
        "ALPHA_VANTAGE_BASE_URL" => Some(market_uri.clone()),
        "MARKET_DATA_TIMEOUT_SECS" => Some("2".to_string()),
        _ => None,
    })
    .unwrap_or_else(|e| panic!("config failed: {e}"));

    FinanceAssistant::from_config(&config).unwrap_or_else(|e| panic!("assistant failed: {e}"))
}

#[tokio::test]
async fn test_stock_turn_end_to_end() {
    let llm = MockServer::start().await;
    let market = MockServer::start().await;

    mock_completion(&llm, "Classify the user's intent", "stock").await;
    mock_completion(&llm, "Extract the stock symbol", "AAPL").await;
    mock_completion(
        &llm,
        "Provide a brief note on investing in AAPL",
        "Diversify around it.",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("symbol", "AAPL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Time Series (Daily)": {
                "2024-01-02": { "4. close": "185.6400" },
                "2024-01-03": { "4. close": "184.2500" }
            }
        })))
        .expect(1)
        .mount(&market)
        .await;

    let outcome = assistant(&llm, &market)
        .run_turn("What did Apple close at?", CarriedMemory::default())
        .await
        .unwrap_or_else(|e| panic!("turn failed: {e}"));

    assert_eq!(outcome.intent, Intent::Stock);
    assert_eq!(outcome.route, Route::StockInfo);
    assert_eq!(
        outcome.reply,
        "The latest closing price for AAPL is $184.2500 (as of 2024-01-03).\nDiversify around it."
    );
    assert_eq!(outcome.memory.long_term.last_intent, Some(Intent::Stock));
}

#[tokio::test]
async fn test_high_risk_turn_never_touches_market_data() {
    let llm = MockServer::start().await;
    let market = MockServer::start().await;

    mock_completion(&llm, "Classify the user's intent", "stock").await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&market)
        .await;

    let assistant = assistant(&llm, &market);
    let mut session = Session::new(Uuid::new_v4());
    let outcome = session
        .handle_message(&assistant, "liquidate my retirement account")
        .await
        .unwrap_or_else(|e| panic!("turn failed: {e}"));

    assert!(outcome.high_risk);
    assert_eq!(outcome.route, Route::HumanEscalation);
    assert!(outcome
        .reply
        .starts_with("The query 'liquidate my retirement account' has been flagged as high-risk."));
    assert_eq!(session.transcript.message_count(), 2);
}

#[tokio::test]
async fn test_profile_then_advice_across_turns() {
    let llm = MockServer::start().await;
    let market = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("User input: I am 34"))
        .respond_with(completion("profile"))
        .mount(&llm)
        .await;
    mock_completion(&llm, "Extract user profile information", "age: 34\ngoal: buy a home").await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("User input: How should I save?"))
        .and(body_string_contains("Previous intent: profile"))
        .respond_with(completion("advice"))
        .mount(&llm)
        .await;
    mock_completion(
        &llm,
        "User profile: {age: 34, goal: buy a home}",
        "Open a high-yield savings account.",
    )
    .await;

    let assistant = assistant(&llm, &market);
    let mut session = Session::new(Uuid::new_v4());

    let first = session
        .handle_message(&assistant, "I am 34 and want to buy a home")
        .await
        .unwrap_or_else(|e| panic!("first turn failed: {e}"));
    assert_eq!(first.route, Route::ProfileCollector);

    let second = session
        .handle_message(&assistant, "How should I save?")
        .await
        .unwrap_or_else(|e| panic!("second turn failed: {e}"));
    assert_eq!(second.route, Route::AdviceProvider);
    assert_eq!(second.reply, "Open a high-yield savings account.");
    assert_eq!(
        session.memory.long_term.last_advice.as_deref(),
        Some("Open a high-yield savings account.")
    );
    assert_eq!(session.memory.user_profile.get("goal"), Some("buy a home"));
}

#[tokio::test]
async fn test_blank_classification_falls_back() {
    let llm = MockServer::start().await;
    let market = MockServer::start().await;

    mock_completion(&llm, "Classify the user's intent", "   ").await;

    let outcome = assistant(&llm, &market)
        .run_turn("hmm", CarriedMemory::default())
        .await
        .unwrap_or_else(|e| panic!("turn failed: {e}"));

    assert_eq!(outcome.intent, Intent::Unknown);
    assert_eq!(outcome.route, Route::Fallback);
    assert_eq!(outcome.reply, FALLBACK_MESSAGE);
}

#[tokio::test]
async fn test_blank_ticker_asks_for_clarification() {
    let llm = MockServer::start().await;
    let market = MockServer::start().await;

    mock_completion(&llm, "Classify the user's intent", "stock").await;
    mock_completion(&llm, "Extract the stock symbol", "").await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&market)
        .await;

    let outcome = assistant(&llm, &market)
        .run_turn("how is that stock doing", CarriedMemory::default())
        .await
        .unwrap_or_else(|e| panic!("turn failed: {e}"));

    assert_eq!(outcome.route, Route::StockInfo);
    assert!(outcome
        .reply
        .starts_with("Sorry, I couldn't identify a valid stock symbol from 'how is that stock doing'"));
}
