//! Fixed-template replies: human escalation and fallback.
//! No external calls, no memory writes.

use crate::models::TurnState;
use tracing::warn;

pub const FALLBACK_MESSAGE: &str =
    "🤔 Sorry, I didn't understand. Try asking about stocks, expenses, budgets, or financial advice.";

/// Escalation notice for high-risk requests.
///
/// The "wait for expert input" is only text; the session is not suspended.
pub fn human_escalation(state: TurnState) -> TurnState {
    warn!("High-risk request escalated to a human advisor");
    let message = escalation_notice(&state.user_input);
    state.with_reply(message)
}

pub fn escalation_notice(user_input: &str) -> String {
    format!(
        "The query '{}' has been flagged as high-risk. \
         This query requires review by a human financial advisor. \
         Please wait for expert input before proceeding.",
        user_input
    )
}

pub fn fallback(state: TurnState) -> TurnState {
    state.with_reply(FALLBACK_MESSAGE)
}
