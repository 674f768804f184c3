//! OpenAI-backed implementation of the `ReplyGenerator` port.
//!
//! Renders the resolved action's guidance as one natural-language reply,
//! in the persona the conversation's treatment calls for, with the recent
//! transcript window as chat context.

use async_trait::async_trait;

use super::openai::{ChatClient, ChatError, ChatMessage, OpenAiConfig};
use crate::domain::conversation::Speaker;
use crate::domain::foundation::Treatment;
use crate::ports::{GenerationError, GenerationRequest, ReplyGenerator};

/// Replies should read naturally, so sampling stays at the default.
const GENERATOR_TEMPERATURE: f32 = 1.0;

/// Reply generator backed by OpenAI's chat completions API.
pub struct OpenAiReplyGenerator {
    model: String,
    client: ChatClient,
}

impl OpenAiReplyGenerator {
    /// Creates a generator using the configured generation model.
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            model: config.generator_model.clone(),
            client: ChatClient::new(config),
        }
    }

    fn system_prompt(request: &GenerationRequest) -> String {
        let persona = match request.treatment() {
            Treatment::Neutral => {
                "You are a customer support assistant for an online shop. \
                 Keep replies brief, factual, and polite. Do not speculate \
                 about anything the customer has not told you."
            }
            Treatment::Empathetic => {
                "You are a warm, understanding customer support assistant for \
                 an online shop. Acknowledge the customer's feelings before \
                 getting to the point, and keep replies brief."
            }
        };

        format!(
            "{persona}\n\nInstruction for this reply: {}",
            request.guidance()
        )
    }

    fn build_messages(request: &GenerationRequest) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(Self::system_prompt(request))];
        for utterance in request.history() {
            messages.push(match utterance.speaker() {
                Speaker::User => ChatMessage::user(utterance.text()),
                Speaker::Bot => ChatMessage::assistant(utterance.text()),
            });
        }
        messages
    }
}

#[async_trait]
impl ReplyGenerator for OpenAiReplyGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let messages = Self::build_messages(&request);

        let content = self
            .client
            .chat(&self.model, GENERATOR_TEMPERATURE, messages)
            .await?;

        let reply = content.trim();
        if reply.is_empty() {
            return Err(GenerationError::EmptyReply);
        }
        Ok(reply.to_string())
    }
}

impl From<ChatError> for GenerationError {
    fn from(error: ChatError) -> Self {
        match error {
            ChatError::Timeout { seconds } => GenerationError::Timeout { seconds },
            ChatError::RateLimited => GenerationError::RateLimited,
            ChatError::Auth => GenerationError::configuration("OpenAI authentication failed"),
            other => GenerationError::request_failed(other.to_string()),
        }
    }
}
