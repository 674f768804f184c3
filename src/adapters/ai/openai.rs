//! OpenAI chat plumbing shared by the classifier and generator adapters.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiConfig::new(api_key)
//!     .with_classifier_model("gpt-4.1")
//!     .with_generator_model("gpt-4o-mini");
//!
//! let classifier = OpenAiSlotClassifier::new(config.clone());
//! let generator = OpenAiReplyGenerator::new(config);
//! ```

use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration shared by both OpenAI-backed adapters.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model used for slot classification.
    pub classifier_model: String,
    /// Model used for reply generation.
    pub generator_model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            classifier_model: "gpt-4.1".to_string(),
            generator_model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the classification model.
    pub fn with_classifier_model(mut self, model: impl Into<String>) -> Self {
        self.classifier_model = model.into();
        self
    }

    /// Sets the generation model.
    pub fn with_generator_model(mut self, model: impl Into<String>) -> Self {
        self.generator_model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Failures of the raw chat call, before they are mapped onto a port error.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("authentication failed")]
    Auth,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("response parse error: {0}")]
    Parse(String),
}

/// One chat message in OpenAI's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Thin client for the chat completions endpoint.
pub struct ChatClient {
    config: OpenAiConfig,
    client: Client,
}

impl ChatClient {
    pub fn new(config: OpenAiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Sends one chat request and returns the first choice's content.
    pub async fn chat(
        &self,
        model: &str,
        temperature: f32,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ChatError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout {
                        seconds: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    ChatError::Network(format!("Connection failed: {e}"))
                } else {
                    ChatError::Network(e.to_string())
                }
            })?;

        let response = self.handle_response_status(response).await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(format!("Failed to parse response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ChatError::Parse("No choices in response".to_string()))
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, ChatError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(ChatError::Auth),
            429 => Err(ChatError::RateLimited),
            400 => Err(ChatError::InvalidRequest(error_body)),
            500..=599 => Err(ChatError::Unavailable(format!(
                "Server error {status}: {error_body}"
            ))),
            _ => Err(ChatError::Network(format!(
                "Unexpected status {status}: {error_body}"
            ))),
        }
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = OpenAiConfig::new("test-key")
            .with_classifier_model("gpt-4.1")
            .with_generator_model("gpt-4o-mini")
            .with_base_url("https://custom.api.com/v1")
            .with_timeout(Duration::from_secs(10));

        assert_eq!(config.classifier_model, "gpt-4.1");
        assert_eq!(config.generator_model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn chat_request_serializes_expected_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::system("be brief"), ChatMessage::user("hello")],
            temperature: 1.0,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["temperature"], 1.0);
    }

    #[test]
    fn debug_output_does_not_leak_the_api_key() {
        let config = OpenAiConfig::new("super-secret-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-key"));
    }
}
