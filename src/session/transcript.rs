//! Conversation transcript
//!
//! Ordered user/assistant messages with timestamps, kept so a host can
//! re-render the conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A single message in the transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub message_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub role: MessageRole,
    pub content: String,
}

impl TranscriptMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            message_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    messages: VecDeque<TranscriptMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            updated_at: Utc::now(),
            messages: VecDeque::new(),
        }
    }

    pub fn add_message(&mut self, message: TranscriptMessage) {
        self.messages.push_back(message);
        self.updated_at = Utc::now();
    }

    /// Record a completed exchange.
    pub fn record_exchange(&mut self, user: &str, assistant: &str) {
        self.add_message(TranscriptMessage::new(MessageRole::User, user));
        self.add_message(TranscriptMessage::new(MessageRole::Assistant, assistant));
    }

    pub fn messages(&self) -> impl Iterator<Item = &TranscriptMessage> {
        self.messages.iter()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
