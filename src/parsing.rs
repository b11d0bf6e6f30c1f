//! Parsing of model output
//!
//! Handlers never look at raw completion text; they go through these
//! functions and work with the typed results.

use crate::models::Intent;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use thiserror::Error;

lazy_static! {
    static ref INTENT_PATTERN: Regex =
        Regex::new(r"(profile|stock|expense|budget|advice)").unwrap();
    static ref TICKER_PATTERN: Regex = Regex::new(r"^[A-Z]{1,5}$").unwrap();
}

/// Static keyword list for escalation
const HIGH_RISK_KEYWORDS: &[&str] = &[
    "liquidate",
    "retirement",
    "all my savings",
    "entire portfolio",
];

/// Markers that mean the model answered with profile fields, not a question
const PROFILE_MARKERS: &[&str] = &["age:", "income:", "goal:", "risk:"];

const TICKER_SENTINEL: &str = "UNKNOWN";

/// Extract the intent label from a classifier completion.
///
/// The first label found anywhere in the lower-cased text wins.
pub fn parse_intent(completion: &str) -> Intent {
    let lowered = completion.trim().to_lowercase();
    INTENT_PATTERN
        .captures(&lowered)
        .and_then(|c| c.get(1))
        .map(|m| Intent::from_label(m.as_str()))
        .unwrap_or(Intent::Unknown)
}

/// Case-insensitive substring match against the escalation keywords.
pub fn is_high_risk(user_input: &str) -> bool {
    let lowered = user_input.to_lowercase();
    HIGH_RISK_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// A validated stock symbol: 1 to 5 uppercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    /// Strict validation, no normalisation.
    pub fn parse(symbol: &str) -> Result<Self, ExtractionFailed> {
        if symbol != TICKER_SENTINEL && TICKER_PATTERN.is_match(symbol) {
            Ok(Self(symbol.to_string()))
        } else {
            Err(ExtractionFailed {
                raw: symbol.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no valid stock symbol in model output {raw:?}")]
pub struct ExtractionFailed {
    pub raw: String,
}

/// Turn a ticker-extraction completion into a symbol.
///
/// The completion is trimmed and upper-cased before strict validation.
pub fn parse_ticker(completion: &str) -> Result<Ticker, ExtractionFailed> {
    Ticker::parse(&completion.trim().to_uppercase())
}

/// What the profile collector's completion turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileReply {
    /// `key: value` pairs, keys lower-cased.
    Fields(Vec<(String, String)>),
    /// No fields; the model asked the user something instead.
    Question(String),
}

pub fn parse_profile_reply(completion: &str) -> ProfileReply {
    let lowered = completion.to_lowercase();
    let has_marker = PROFILE_MARKERS.iter().any(|m| lowered.contains(m));

    if has_marker {
        let fields: Vec<(String, String)> = completion
            .lines()
            .filter_map(|line| line.split_once(": "))
            .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
            .filter(|(key, _)| !key.is_empty())
            .collect();

        if !fields.is_empty() {
            return ProfileReply::Fields(fields);
        }
    }

    ProfileReply::Question(completion.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_intent_first_label_wins() {
        assert_eq!(parse_intent("Stock"), Intent::Stock);
        assert_eq!(parse_intent("  'budget'\n"), Intent::Budget);
        assert_eq!(parse_intent("Intent: advice (maybe profile)"), Intent::Advice);
        assert_eq!(parse_intent("The intent is EXPENSE."), Intent::Expense);
    }

    #[test]
    fn test_parse_intent_unknown() {
        assert_eq!(parse_intent("unknown"), Intent::Unknown);
        assert_eq!(parse_intent(""), Intent::Unknown);
        assert_eq!(parse_intent("greeting"), Intent::Unknown);
    }

    #[test]
    fn test_high_risk_keywords() {
        assert!(is_high_risk("liquidate my retirement account"));
        assert!(is_high_risk("Should I put ALL MY SAVINGS into crypto?"));
        assert!(is_high_risk("sell my Entire Portfolio"));
        assert!(!is_high_risk("what is the price of AAPL"));
        assert!(!is_high_risk(""));
    }

    #[test]
    fn test_ticker_validation_accepts() {
        for s in ["A", "F", "AAPL", "GOOGL", "BRKB"] {
            assert_eq!(Ticker::parse(s).unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_ticker_validation_rejects() {
        for s in ["UNKNOWN", "", "aapl", "Aapl", "TOOLONG", "BRK.B", "AB1", " AAPL", "ÄPPL"] {
            assert!(Ticker::parse(s).is_err(), "accepted {:?}", s);
        }
    }

    #[test]
    fn test_parse_ticker_normalises_completion() {
        assert_eq!(parse_ticker(" msft\n").unwrap().as_str(), "MSFT");
        assert!(parse_ticker("unknown").is_err());
        assert!(parse_ticker("The symbol is AAPL").is_err());
        let err = parse_ticker("n/a").unwrap_err();
        assert_eq!(err.raw, "N/A");
    }

    #[test]
    fn test_profile_fields() {
        let reply = parse_profile_reply("Age: 34\nIncome: 85,000 USD\nThanks for sharing!");
        assert_eq!(
            reply,
            ProfileReply::Fields(vec![
                ("age".to_string(), "34".to_string()),
                ("income".to_string(), "85,000 USD".to_string()),
            ])
        );
    }

    #[test]
    fn test_profile_single_field() {
        assert_eq!(
            parse_profile_reply("age: 34"),
            ProfileReply::Fields(vec![("age".to_string(), "34".to_string())])
        );
    }

    #[test]
    fn test_profile_question_without_delimiter() {
        let text = "How old are you, and what are your financial goals?";
        assert_eq!(
            parse_profile_reply(text),
            ProfileReply::Question(text.to_string())
        );
    }

    #[test]
    fn test_profile_delimiter_without_marker_is_question() {
        let text = "Note: I need a bit more information. What is your income?";
        assert_eq!(
            parse_profile_reply(text),
            ProfileReply::Question(text.to_string())
        );
    }
}
