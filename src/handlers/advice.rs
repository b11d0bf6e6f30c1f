//! Personalised advice
//!
//! The reply is kept in long-term memory as `last_advice`; both the
//! classifier and the next advice prompt read it back.

use super::HandlerContext;
use crate::models::TurnState;
use crate::Result;

pub async fn provide_advice(ctx: &HandlerContext, state: TurnState) -> Result<TurnState> {
    let prompt = format!(
        "Provide personalized financial advice based on: {}. \
         User profile: {}. \
         Previous advice: {}. \
         Use clear, empathetic language suitable for users with limited financial literacy.",
        state.user_input,
        state.user_profile.render(),
        state.long_term.last_advice.as_deref().unwrap_or("none")
    );
    let message = ctx.llm.complete(&prompt).await?.trim().to_string();

    let mut long_term = state.long_term;
    long_term.last_advice = Some(message.clone());

    Ok(TurnState { long_term, ..state }.with_reply(message))
}
