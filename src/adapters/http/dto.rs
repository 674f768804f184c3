//! Data transfer objects for the conversation HTTP endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::Speaker;
use crate::domain::foundation::Treatment;

// ═══════════════════════════════════════════════════════════════════════════
// Request DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Request to open a new conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateConversationRequest {
    /// Treatment arm for this conversation; the configured fallback applies
    /// when absent.
    #[serde(default)]
    pub treatment: Option<Treatment>,
}

/// Request to send one user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageRequest {
    /// The user's message text
    pub text: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// Response DTOs
// ═══════════════════════════════════════════════════════════════════════════

/// Response after opening a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationCreatedResponse {
    /// Conversation ID for subsequent messages
    pub conversation_id: String,
    /// The welcome line already on the transcript
    pub reply: String,
    /// State the conversation starts in
    pub state: String,
    /// Treatment arm the conversation runs under
    pub treatment: Treatment,
}

/// Response after processing one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    /// Conversation ID
    pub conversation_id: String,
    /// The bot's reply to this message
    pub reply: String,
    /// State the conversation is in after this turn
    pub state: String,
    /// Whether the conversation has reached its terminal state
    pub is_final: bool,
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Who said it
    pub speaker: Speaker,
    /// What was said
    pub text: String,
}

/// Full conversation view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationResponse {
    /// Conversation ID
    pub conversation_id: String,
    /// Treatment arm
    pub treatment: Treatment,
    /// Current state
    pub state: String,
    /// Whether the conversation has ended
    pub is_final: bool,
    /// Everything said so far, oldest first
    pub transcript: Vec<TranscriptEntry>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

/// Error payload for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error description
    pub error: String,
}
