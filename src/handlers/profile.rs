//! Profile collection
//!
//! The model either echoes structured `key: value` fields, which are merged
//! into the profile, or asks a follow-up question, which becomes the turn's
//! `last_question`.

use super::HandlerContext;
use crate::models::TurnState;
use crate::parsing::{parse_profile_reply, ProfileReply};
use crate::Result;
use tracing::info;

pub async fn collect_user_data(ctx: &HandlerContext, state: TurnState) -> Result<TurnState> {
    let prompt = format!(
        "Extract user profile information (age, income, financial goals, risk tolerance) from: {}. \
         Current profile: {}. \
         If no new information is provided, ask a question to gather missing data \
         (e.g., 'How old are you?' or 'What are your financial goals?'). \
         Keep tone empathetic and clear.",
        state.user_input,
        state.user_profile.render()
    );

    let message = ctx.llm.complete(&prompt).await?.trim().to_string();

    let mut user_profile = state.user_profile;
    let mut short_term = state.short_term;

    match parse_profile_reply(&message) {
        ProfileReply::Fields(fields) => {
            info!(fields = fields.len(), "Profile fields extracted");
            for (key, value) in fields {
                user_profile.insert(key, value);
            }
        }
        ProfileReply::Question(question) => {
            short_term.last_question = Some(question);
        }
    }

    Ok(TurnState {
        user_profile,
        short_term,
        ..state
    }
    .with_reply(message))
}
