//! Core data models for the finance advisor

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

//
// ================= Enums =================
//

/// Classified purpose of a user message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Profile,
    Stock,
    Expense,
    Budget,
    Advice,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Profile => "profile",
            Intent::Stock => "stock",
            Intent::Expense => "expense",
            Intent::Budget => "budget",
            Intent::Advice => "advice",
            Intent::Unknown => "unknown",
        }
    }

    /// Parse an exact label. Anything outside the label set is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "profile" => Intent::Profile,
            "stock" => Intent::Stock,
            "expense" => Intent::Expense,
            "budget" => Intent::Budget,
            "advice" => Intent::Advice,
            _ => Intent::Unknown,
        }
    }
}

/// Handler selected for a turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    ProfileCollector,
    StockInfo,
    ExpenseTracker,
    BudgetSummary,
    AdviceProvider,
    HumanEscalation,
    Fallback,
}

//
// ================= Memory =================
//

/// Free-form user profile (age, income, goal, risk tolerance, ...).
///
/// Ordered so prompts render it deterministically.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct UserProfile(BTreeMap<String, String>);

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the profile for prompt embedding.
    pub fn render(&self) -> String {
        if self.0.is_empty() {
            return "{}".to_string();
        }
        let fields: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect();
        format!("{{{}}}", fields.join(", "))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UserProfile {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Per-turn scratchpad. Never leaves the turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortTermMemory {
    pub previous_intent: Option<Intent>,
    pub last_question: Option<String>,
    pub last_stock_requested: Option<String>,
    pub last_expense: Option<String>,
}

/// State carried across turns of one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LongTermMemory {
    pub last_advice: Option<String>,
    pub last_intent: Option<Intent>,
}

/// What the session host keeps between turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarriedMemory {
    pub user_profile: UserProfile,
    pub long_term: LongTermMemory,
}

//
// ================= Turn State =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reply {
    pub response: String,
}

/// State threaded through classifier and handler for a single turn.
///
/// Each stage takes it by value and returns the updated state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    pub user_input: String,
    pub intent: Option<Intent>,
    pub reply: Option<Reply>,
    pub user_profile: UserProfile,
    pub short_term: ShortTermMemory,
    pub long_term: LongTermMemory,
    pub high_risk: bool,
}

impl TurnState {
    /// Fresh turn: short-term memory starts empty, carried memory is moved in.
    pub fn new(user_input: impl Into<String>, carried: CarriedMemory) -> Self {
        Self {
            user_input: user_input.into(),
            intent: None,
            reply: None,
            user_profile: carried.user_profile,
            short_term: ShortTermMemory::default(),
            long_term: carried.long_term,
            high_risk: false,
        }
    }

    pub fn with_reply(self, response: impl Into<String>) -> Self {
        Self {
            reply: Some(Reply {
                response: response.into(),
            }),
            ..self
        }
    }

    /// Split the finished turn into its reply text and the memory to carry.
    pub fn into_outcome(self) -> (String, CarriedMemory) {
        let reply = self.reply.map(|r| r.response).unwrap_or_default();
        (
            reply,
            CarriedMemory {
                user_profile: self.user_profile,
                long_term: self.long_term,
            },
        )
    }
}

/// Result of one completed turn, as seen by a session host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub intent: Intent,
    pub route: Route,
    pub high_risk: bool,
    pub memory: CarriedMemory,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Route::ProfileCollector => "Collect User Data",
            Route::StockInfo => "Stock Info",
            Route::ExpenseTracker => "Expense Tracker",
            Route::BudgetSummary => "Budget Summary",
            Route::AdviceProvider => "Provide Advice",
            Route::HumanEscalation => "Human in the Loop",
            Route::Fallback => "Fallback",
        };
        write!(f, "{}", s)
    }
}
