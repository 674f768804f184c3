//! AI provider configuration.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// OpenAI credentials and model selection.
///
/// The classifier and generator run on separate models; classification wants
/// the stronger model, generation the cheaper one.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Model used for slot classification
    pub classifier_model: String,

    /// Model used for reply generation
    pub generator_model: String,

    /// Base URL for the OpenAI API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            classifier_model: "gpt-4.1".to_string(),
            generator_model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pick_the_production_models() {
        let config = AiConfig::default();
        assert_eq!(config.classifier_model, "gpt-4.1");
        assert_eq!(config.generator_model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn missing_api_key_fails_validation() {
        let config = AiConfig::default();
        assert!(!config.has_api_key());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = AiConfig {
            openai_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!config.has_api_key());
        assert!(config.validate().is_err());
    }

    #[test]
    fn key_plus_defaults_validates() {
        let config = AiConfig {
            openai_api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert!(config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let config = AiConfig {
            openai_api_key: Some("sk-test".to_string()),
            base_url: "ftp://api.openai.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidBaseUrl(url)) if url.starts_with("ftp://")
        ));
    }

    #[test]
    fn overriding_one_model_keeps_the_other_default() {
        let config: AiConfig =
            serde_json::from_str(r#"{"classifier_model": "gpt-4.1-mini"}"#).unwrap();
        assert_eq!(config.classifier_model, "gpt-4.1-mini");
        assert_eq!(config.generator_model, "gpt-4o-mini");
    }
}
