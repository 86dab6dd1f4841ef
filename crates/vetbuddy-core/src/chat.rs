//! Virtual assistant chat payloads.

use serde::{Deserialize, Serialize};

/// Shortest assistant reply accepted as a real answer.
pub const MIN_REPLY_CHARS: usize = 50;

/// Words that show a reply talks about pricing.
pub const PRICING_TERMS: [&str; 6] = ["prezzo", "costo", "€", "euro", "gratuito", "piano"];

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Visitor.
    User,
    /// Virtual assistant.
    Assistant,
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who spoke.
    pub role: ChatRole,
    /// What was said.
    pub content: String,
}

impl ChatMessage {
    /// A visitor turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// An assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Conversation so far, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Client-chosen session id.
    pub session_id: String,
}

/// Assistant answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Whether the assistant produced an answer.
    pub success: bool,
    /// Answer text.
    pub message: String,
    /// Echoed session id.
    pub session_id: String,
    /// Failure reason when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatReply {
    /// Whether the answer mentions the product by name.
    #[must_use]
    pub fn mentions_vetbuddy(&self) -> bool {
        self.message.to_lowercase().contains("vetbuddy")
    }

    /// Whether the answer talks about prices.
    #[must_use]
    pub fn mentions_pricing(&self) -> bool {
        let lower = self.message.to_lowercase();
        PRICING_TERMS.iter().any(|term| lower.contains(term))
    }

    /// Answer length in characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.message.chars().count()
    }
}
