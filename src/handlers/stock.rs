//! Stock lookup
//!
//! Ticker extraction goes through the model and is then gated by strict
//! validation, so only well-formed symbols reach the market-data provider.
//! Every market-data outcome, including transport failures, ends in a reply.

use super::HandlerContext;
use crate::market_data::DailySeries;
use crate::models::TurnState;
use crate::parsing::{parse_ticker, Ticker};
use crate::Result;
use tracing::{error, info, warn};

pub const RATE_LIMIT_MESSAGE: &str =
    "Alpha Vantage API rate limit exceeded. Please try again in a minute.";

const RISK_TOLERANCE_KEY: &str = "risk tolerance";

pub async fn stock_info(ctx: &HandlerContext, state: TurnState) -> Result<TurnState> {
    let prompt = format!(
        "Extract the stock symbol (e.g., 'AAPL' for Apple) from the request: {}. \
         Return only the symbol (e.g., 'AAPL') or 'UNKNOWN' if unclear. Do not include extra text.",
        state.user_input
    );
    let completion = ctx.llm.complete(&prompt).await?;

    let message = match parse_ticker(&completion) {
        Ok(ticker) => quote_message(ctx, &state, &ticker).await,
        Err(e) => {
            warn!("Invalid stock symbol extracted: {}", e);
            format!(
                "Sorry, I couldn't identify a valid stock symbol from '{}'. \
                 Please specify the stock (e.g., 'AAPL' for Apple).",
                state.user_input
            )
        }
    };

    let mut short_term = state.short_term;
    short_term.last_stock_requested = Some(state.user_input.clone());

    Ok(TurnState { short_term, ..state }.with_reply(message))
}

async fn quote_message(ctx: &HandlerContext, state: &TurnState, ticker: &Ticker) -> String {
    let outcome = ctx.market_data.daily_series(ticker).await;

    match outcome {
        Ok(DailySeries::TimeSeries(series)) => {
            let Some((date, bar)) = series.latest() else {
                return no_data_message(ticker);
            };
            let mut message = format!(
                "The latest closing price for {} is ${} (as of {}).",
                ticker,
                bar.close,
                date.format("%Y-%m-%d")
            );
            info!(symbol = %ticker, %date, close = %bar.close, "Quote resolved");

            if let Some(note) = risk_note(ctx, state, ticker).await {
                message.push('\n');
                message.push_str(&note);
            }
            message
        }
        Ok(DailySeries::ProviderError(provider_message)) => {
            error!(symbol = %ticker, "Alpha Vantage error: {}", provider_message);
            format!(
                "Error from Alpha Vantage: {}. Please check the stock symbol or try again later.",
                provider_message
            )
        }
        Ok(DailySeries::RateLimited) => {
            warn!(symbol = %ticker, "Alpha Vantage rate limit exceeded");
            RATE_LIMIT_MESSAGE.to_string()
        }
        Ok(DailySeries::Malformed) => {
            error!(symbol = %ticker, "No time series data in response");
            no_data_message(ticker)
        }
        Err(e) => {
            error!(symbol = %ticker, "Request error: {}", e);
            format!(
                "Error fetching data for {}: {}. Please try again later.",
                ticker, e
            )
        }
    }
}

/// Short note tailored to the stored risk tolerance. A failed call drops the
/// note; the quote itself is still returned.
async fn risk_note(ctx: &HandlerContext, state: &TurnState, ticker: &Ticker) -> Option<String> {
    let risk_tolerance = state
        .user_profile
        .get(RISK_TOLERANCE_KEY)
        .unwrap_or("unknown");

    let prompt = format!(
        "Provide a brief note on investing in {} tailored to a user with {} risk tolerance. \
         Keep it clear and empathetic.",
        ticker, risk_tolerance
    );

    match ctx.llm.complete(&prompt).await {
        Ok(note) => Some(note.trim().to_string()).filter(|n| !n.is_empty()),
        Err(e) => {
            warn!(symbol = %ticker, "Risk note unavailable, replying with quote only: {}", e);
            None
        }
    }
}

fn no_data_message(ticker: &Ticker) -> String {
    format!(
        "No data available for {}. Please check the symbol or try again later.",
        ticker
    )
}
