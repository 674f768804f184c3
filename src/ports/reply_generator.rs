//! Reply Generator Port - Interface for rendering the bot's reply.
//!
//! The dialogue engine decides *what* to say (the action); the generator
//! decides *how* to say it, in the conversation's treatment register.
//! Failures are recoverable: the orchestrator falls back to the action's
//! canned line.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::Utterance;
use crate::domain::foundation::{ActionId, Treatment};

/// One generation request: the action to render, the register to render it
/// in, and the recent conversation context.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    action: ActionId,
    treatment: Treatment,
    guidance: String,
    history: Vec<Utterance>,
}

impl GenerationRequest {
    pub fn new(
        action: impl Into<ActionId>,
        treatment: Treatment,
        guidance: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            treatment,
            guidance: guidance.into(),
            history: Vec::new(),
        }
    }

    /// Attaches the recent transcript window, oldest first.
    pub fn with_history(mut self, history: Vec<Utterance>) -> Self {
        self.history = history;
        self
    }

    pub fn action(&self) -> &ActionId {
        &self.action
    }

    pub fn treatment(&self) -> Treatment {
        self.treatment
    }

    pub fn guidance(&self) -> &str {
        &self.guidance
    }

    pub fn history(&self) -> &[Utterance] {
        &self.history
    }
}

/// Errors that can occur during reply generation
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generator request failed: {0}")]
    RequestFailed(String),

    #[error("Generator returned an empty reply")]
    EmptyReply,

    #[error("Generator request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Generator rate limit exceeded")]
    RateLimited,

    #[error("Invalid generator configuration: {0}")]
    Configuration(String),
}

impl GenerationError {
    /// Creates a RequestFailed error.
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed(message.into())
    }

    /// Creates a Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Port for rendering a reply action as natural language.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Renders the requested action as one bot reply.
    ///
    /// # Errors
    /// Returns `GenerationError` if the provider fails or produces nothing
    /// usable.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}
