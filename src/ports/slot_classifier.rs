//! Slot Classifier Port - Interface for per-turn slot classification.
//!
//! Given one user message and the slots the current dialogue state cares
//! about, the classifier answers true or false for every slot. Failures are
//! recoverable: the orchestrator degrades to pattern matching.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::slots::{SlotDescriptor, SlotVerdicts};

/// One classification request: the message, its immediate context, and the
/// slots to answer for.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    user_text: String,
    last_bot_message: Option<String>,
    slots: Vec<SlotDescriptor>,
}

impl ClassificationRequest {
    pub fn new(user_text: impl Into<String>, slots: Vec<SlotDescriptor>) -> Self {
        Self {
            user_text: user_text.into(),
            last_bot_message: None,
            slots,
        }
    }

    /// Attaches the bot line the user is replying to.
    pub fn with_last_bot_message(mut self, message: impl Into<String>) -> Self {
        self.last_bot_message = Some(message.into());
        self
    }

    pub fn user_text(&self) -> &str {
        &self.user_text
    }

    pub fn last_bot_message(&self) -> Option<&str> {
        self.last_bot_message.as_deref()
    }

    pub fn slots(&self) -> &[SlotDescriptor] {
        &self.slots
    }
}

/// Errors that can occur during slot classification
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("Classifier request failed: {0}")]
    RequestFailed(String),

    #[error("Classifier returned malformed output: {0}")]
    MalformedOutput(String),

    #[error("Classifier request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Classifier rate limit exceeded")]
    RateLimited,

    #[error("Invalid classifier configuration: {0}")]
    Configuration(String),
}

impl ClassificationError {
    /// Creates a RequestFailed error.
    pub fn request_failed(message: impl Into<String>) -> Self {
        Self::RequestFailed(message.into())
    }

    /// Creates a MalformedOutput error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedOutput(message.into())
    }

    /// Creates a Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Port for classifying which slots a user message fills.
///
/// Implementations must answer every requested slot; the verdict map may
/// contain explicit `false` entries, which downstream validation treats
/// differently from absent slots.
#[async_trait]
pub trait SlotClassifier: Send + Sync {
    /// Classifies one user message against the requested slots.
    ///
    /// # Errors
    /// Returns `ClassificationError` if the provider fails or its output
    /// cannot be interpreted as per-slot verdicts.
    async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<SlotVerdicts, ClassificationError>;
}
