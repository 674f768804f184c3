//! Errors for configuration loading and validation.

use thiserror::Error;

/// Errors raised while assembling the application configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors raised by per-section configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid server port: {0}")]
    InvalidPort(u16),

    #[error("Invalid request timeout: {0}s (must be 1-300)")]
    InvalidTimeout(u64),

    #[error("AI base URL must start with http:// or https://, got `{0}`")]
    InvalidBaseUrl(String),
}
