//! Turn pipeline
//!
//! INPUT → CLASSIFY → ROUTE → HANDLE → REPLY
//!
//! A turn either completes and returns the updated carried memory, or fails
//! and leaves the caller's memory untouched.

use crate::classifier::IntentClassifier;
use crate::config::AdvisorConfig;
use crate::handlers::{self, HandlerContext};
use crate::llm::{GroqClient, LlmClient};
use crate::market_data::{AlphaVantageClient, MarketDataClient};
use crate::models::{CarriedMemory, Intent, TurnOutcome, TurnState};
use crate::router;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, Instrument};

pub struct FinanceAssistant {
    classifier: IntentClassifier,
    handlers: HandlerContext,
}

impl FinanceAssistant {
    pub fn new(llm: Arc<dyn LlmClient>, market_data: Arc<dyn MarketDataClient>) -> Self {
        Self {
            classifier: IntentClassifier::new(llm.clone()),
            handlers: HandlerContext::new(llm, market_data),
        }
    }

    /// Wire the production Groq and Alpha Vantage clients.
    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        let llm = Arc::new(GroqClient::from_config(config)?);
        let market_data = Arc::new(AlphaVantageClient::from_config(config)?);
        info!(model = %llm.model(), "Finance assistant initialized");
        Ok(Self::new(llm, market_data))
    }

    /// Process one user message against the carried session memory.
    pub async fn run_turn(&self, user_input: &str, carried: CarriedMemory) -> Result<TurnOutcome> {
        let span = info_span!("turn", input_chars = user_input.len());
        self.run_turn_inner(user_input, carried).instrument(span).await
    }

    async fn run_turn_inner(
        &self,
        user_input: &str,
        carried: CarriedMemory,
    ) -> Result<TurnOutcome> {
        let start = Instant::now();
        let state = TurnState::new(user_input, carried);

        let state = self.classifier.classify(state).await?;
        let intent = state.intent.unwrap_or(Intent::Unknown);
        let high_risk = state.high_risk;

        let route = router::route(state.intent, high_risk);
        info!(intent = %intent, high_risk, route = %route, "Turn routed");

        let mut state = handlers::execute(route, &self.handlers, state).await?;
        state.long_term.last_intent = Some(intent);

        let (reply, memory) = state.into_outcome();

        info!(
            route = %route,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Turn complete"
        );

        Ok(TurnOutcome {
            reply,
            intent,
            route,
            high_risk,
            memory,
        })
    }
}
