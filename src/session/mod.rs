//! Session host state
//!
//! A session owns the memory carried between turns and the transcript.
//! It is created on first use and lives as long as the hosting process.

use crate::assistant::FinanceAssistant;
use crate::error::AdvisorError;
use crate::models::{CarriedMemory, TurnOutcome};
use crate::Result;
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

pub mod store;
pub mod transcript;

pub use store::SessionStore;
pub use transcript::{MessageRole, Transcript, TranscriptMessage};

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub memory: CarriedMemory,
    pub transcript: Transcript,
}

impl Session {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            created_at: Utc::now(),
            memory: CarriedMemory::default(),
            transcript: Transcript::new(),
        }
    }

    /// Run one turn and commit its results.
    ///
    /// On failure neither the carried memory nor the transcript change.
    pub async fn handle_message(
        &mut self,
        assistant: &FinanceAssistant,
        message: &str,
    ) -> Result<TurnOutcome> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AdvisorError::SessionError("message is empty".to_string()));
        }

        let outcome = match assistant.run_turn(message, self.memory.clone()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(session_id = %self.session_id, "Turn failed, session unchanged: {}", e);
                return Err(e);
            }
        };

        self.memory = outcome.memory.clone();
        self.transcript.record_exchange(message, &outcome.reply);

        Ok(outcome)
    }
}
