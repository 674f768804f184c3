//! Conversation module - the per-conversation aggregate and its transcript.
//!
//! This module defines:
//! - Utterance and Speaker, the transcript entries
//! - ConversationSession, everything a conversation carries between turns

mod message;
mod session;

pub use message::{Speaker, Utterance};
pub use session::ConversationSession;
