//! Handler dispatch

use crate::models::{Intent, Route};

/// Pick the handler for a classified turn.
///
/// The high-risk flag overrides the intent unconditionally.
pub fn route(intent: Option<Intent>, high_risk: bool) -> Route {
    if high_risk {
        return Route::HumanEscalation;
    }

    match intent {
        Some(Intent::Profile) => Route::ProfileCollector,
        Some(Intent::Stock) => Route::StockInfo,
        Some(Intent::Expense) => Route::ExpenseTracker,
        Some(Intent::Budget) => Route::BudgetSummary,
        Some(Intent::Advice) => Route::AdviceProvider,
        Some(Intent::Unknown) | None => Route::Fallback,
    }
}
