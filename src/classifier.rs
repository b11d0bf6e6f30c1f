//! Intent Classifier
//!
//! One LLM call picks the label; a keyword scan sets the high-risk flag.
//! The flag is computed from the raw user text only, so a misclassified
//! message still escalates.

use crate::error::AdvisorError;
use crate::llm::LlmClient;
use crate::models::TurnState;
use crate::parsing::{is_high_risk, parse_intent};
use crate::Result;
use std::sync::Arc;
use tracing::{error, info};

pub struct IntentClassifier {
    llm: Arc<dyn LlmClient>,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Classify the turn's input, setting `intent`, `high_risk` and the
    /// short-term `previous_intent`.
    pub async fn classify(&self, state: TurnState) -> Result<TurnState> {
        let prompt = build_classification_prompt(&state);

        let completion = self.llm.complete(&prompt).await.map_err(|e| {
            error!("Intent classification failed: {}", e);
            AdvisorError::ClassificationUnavailable(e.to_string())
        })?;

        let intent = parse_intent(&completion);
        let high_risk = is_high_risk(&state.user_input);

        info!(intent = %intent, high_risk, "Intent classified");

        let mut short_term = state.short_term;
        short_term.previous_intent = Some(intent);

        Ok(TurnState {
            intent: Some(intent),
            high_risk,
            short_term,
            ..state
        })
    }
}

fn build_classification_prompt(state: &TurnState) -> String {
    let previous_intent = state
        .short_term
        .previous_intent
        .or(state.long_term.last_intent)
        .map(|i| i.as_str())
        .unwrap_or("none");

    let last_advice = state.long_term.last_advice.as_deref().unwrap_or("none");

    format!(
        "Classify the user's intent into one of: 'profile', 'stock', 'expense', 'budget', 'advice', or 'unknown'.\n\
         User input: {}\n\
         Previous intent: {}\n\
         Long-term context: {}\n\
         Intent:",
        state.user_input, previous_intent, last_advice
    )
}
