//! OpenAI-backed implementation of the `SlotClassifier` port.
//!
//! Sends the customer's latest message (and the assistant message that
//! preceded it) to a chat model together with the slot descriptions for the
//! current dialogue state, and parses the model's JSON verdict object back
//! into `SlotVerdicts`.

use async_trait::async_trait;
use serde_json::Value;

use super::openai::{ChatClient, ChatError, ChatMessage, OpenAiConfig};
use crate::domain::slots::{SlotDescriptor, SlotVerdicts};
use crate::ports::{ClassificationError, ClassificationRequest, SlotClassifier};

/// Classification needs determinism, so sampling is disabled.
const CLASSIFIER_TEMPERATURE: f32 = 0.0;

/// Slot classifier backed by OpenAI's chat completions API.
pub struct OpenAiSlotClassifier {
    model: String,
    client: ChatClient,
}

impl OpenAiSlotClassifier {
    /// Creates a classifier using the configured classification model.
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            model: config.classifier_model.clone(),
            client: ChatClient::new(config),
        }
    }

    fn system_prompt(slots: &[SlotDescriptor]) -> String {
        let mut prompt = String::from(
            "You are a strict classifier for a customer support conversation. \
             Decide which of the following statements are true of the customer's \
             latest message, given the assistant message that preceded it.\n\nSlots:\n",
        );
        for slot in slots {
            prompt.push_str(&format!("- {}: {}\n", slot.id, slot.description));
        }
        for slot in slots {
            if let Some(validation) = &slot.validation_slot {
                prompt.push_str(&format!(
                    "\nIf `{}` is false, report `{}` as false as well.",
                    slot.id, validation
                ));
            }
        }
        prompt.push_str(
            "\n\nRespond with a single JSON object mapping every slot name to \
             true or false, for example: {\"slot_name\": true}. \
             Do not include any other text.",
        );
        prompt
    }

    fn user_prompt(request: &ClassificationRequest) -> String {
        let mut prompt = String::new();
        if let Some(last) = request.last_bot_message() {
            prompt.push_str(&format!("Previous assistant message:\n{last}\n\n"));
        }
        prompt.push_str(&format!("Customer message:\n{}", request.user_text()));
        prompt
    }

    fn parse_verdicts(
        content: &str,
        slots: &[SlotDescriptor],
    ) -> Result<SlotVerdicts, ClassificationError> {
        let body = strip_code_fences(content);
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ClassificationError::malformed(format!("not valid JSON: {e}")))?;
        let object = value
            .as_object()
            .ok_or_else(|| ClassificationError::malformed("expected a JSON object of verdicts"))?;

        // Every requested slot gets a verdict; anything the model left out
        // counts as false.
        Ok(slots
            .iter()
            .map(|slot| {
                let verdict = object.get(slot.id.as_str()).map(coerce_verdict).unwrap_or(false);
                (slot.id.clone(), verdict)
            })
            .collect())
    }
}

#[async_trait]
impl SlotClassifier for OpenAiSlotClassifier {
    async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<SlotVerdicts, ClassificationError> {
        if request.slots().is_empty() {
            return Ok(SlotVerdicts::new());
        }

        let messages = vec![
            ChatMessage::system(Self::system_prompt(request.slots())),
            ChatMessage::user(Self::user_prompt(&request)),
        ];

        let content = self
            .client
            .chat(&self.model, CLASSIFIER_TEMPERATURE, messages)
            .await?;

        Self::parse_verdicts(&content, request.slots())
    }
}

impl From<ChatError> for ClassificationError {
    fn from(error: ChatError) -> Self {
        match error {
            ChatError::Timeout { seconds } => ClassificationError::Timeout { seconds },
            ChatError::RateLimited => ClassificationError::RateLimited,
            ChatError::Auth => {
                ClassificationError::configuration("OpenAI authentication failed")
            }
            ChatError::Parse(message) => ClassificationError::malformed(message),
            other => ClassificationError::request_failed(other.to_string()),
        }
    }
}

/// Models occasionally wrap JSON in markdown fences; strip them before parsing.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn coerce_verdict(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => s.eq_ignore_ascii_case("true") || s == "1",
        _ => false,
    }
}
