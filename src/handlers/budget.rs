//! Budget summary (mock: the model invents categories and totals)

use super::HandlerContext;
use crate::models::TurnState;
use crate::Result;

pub async fn budget_summary(ctx: &HandlerContext, state: TurnState) -> Result<TurnState> {
    let prompt = format!(
        "Mock a simple budget summary with categories and totals, tailored to user profile: {}. \
         Use clear, empathetic language.",
        state.user_profile.render()
    );
    let message = ctx.llm.complete(&prompt).await?.trim().to_string();

    Ok(state.with_reply(message))
}
