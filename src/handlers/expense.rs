//! Expense logging (mock: the model composes the confirmation)

use super::HandlerContext;
use crate::models::TurnState;
use crate::Result;

pub async fn track_expense(ctx: &HandlerContext, state: TurnState) -> Result<TurnState> {
    let prompt = format!(
        "Mock adding an expense based on: {}. \
         Consider user profile: {}. \
         Reply with a confirmation message, e.g., 'Added expense of $50 for groceries.'",
        state.user_input,
        state.user_profile.render()
    );
    let message = ctx.llm.complete(&prompt).await?.trim().to_string();

    let mut short_term = state.short_term;
    short_term.last_expense = Some(state.user_input.clone());

    Ok(TurnState { short_term, ..state }.with_reply(message))
}
