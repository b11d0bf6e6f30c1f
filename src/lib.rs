//! Finance Advisor
//!
//! A conversational personal-finance assistant that:
//! - Classifies each message into a fixed intent set with one LLM call
//! - Escalates high-risk requests to a human advisor ahead of any intent
//! - Looks up daily closing prices from Alpha Vantage
//! - Collects a free-form user profile and remembers prior advice
//!
//! TURN:
//! INPUT → CLASSIFY → ROUTE → HANDLE → REPLY

pub mod api;
pub mod assistant;
pub mod classifier;
pub mod config;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod market_data;
pub mod models;
pub mod parsing;
pub mod router;
pub mod session;

pub use error::Result;

// Re-export common types
pub use assistant::FinanceAssistant;
pub use config::AdvisorConfig;
pub use models::*;
