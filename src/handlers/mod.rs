//! Route handlers
//!
//! Each handler takes the classified `TurnState` by value and returns it
//! with a reply set and its memory updates applied.

use crate::llm::LlmClient;
use crate::market_data::MarketDataClient;
use crate::models::{Route, TurnState};
use crate::Result;
use std::sync::Arc;
use tracing::debug;

pub mod advice;
pub mod budget;
pub mod expense;
pub mod notices;
pub mod profile;
pub mod stock;

/// External collaborators available to handlers.
#[derive(Clone)]
pub struct HandlerContext {
    pub llm: Arc<dyn LlmClient>,
    pub market_data: Arc<dyn MarketDataClient>,
}

impl HandlerContext {
    pub fn new(llm: Arc<dyn LlmClient>, market_data: Arc<dyn MarketDataClient>) -> Self {
        Self { llm, market_data }
    }
}

/// Run the handler for `route`.
pub async fn execute(route: Route, ctx: &HandlerContext, state: TurnState) -> Result<TurnState> {
    debug!(route = %route, "Executing handler");

    match route {
        Route::ProfileCollector => profile::collect_user_data(ctx, state).await,
        Route::StockInfo => stock::stock_info(ctx, state).await,
        Route::ExpenseTracker => expense::track_expense(ctx, state).await,
        Route::BudgetSummary => budget::budget_summary(ctx, state).await,
        Route::AdviceProvider => advice::provide_advice(ctx, state).await,
        Route::HumanEscalation => Ok(notices::human_escalation(state)),
        Route::Fallback => Ok(notices::fallback(state)),
    }
}
