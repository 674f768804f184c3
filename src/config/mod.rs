//! Typed application configuration loaded from the environment.
//!
//! Values come from environment variables with the `DIALOGUE` prefix, with
//! `__` separating section from field, on top of an optional `.env` file for
//! development. Every section carries defaults; only the OpenAI key is
//! genuinely required.
//!
//! # Example
//!
//! ```no_run
//! use dialogue_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod bot;
mod error;
mod server;

pub use ai::AiConfig;
pub use bot::BotConfig;
pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration, one field per section.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, timeouts)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Bot behavior configuration (treatment fallback, catalog location)
    #[serde(default)]
    pub bot: BotConfig,
}

impl AppConfig {
    /// Reads `.env` if present, then deserializes `DIALOGUE__*` environment
    /// variables into the typed sections.
    ///
    /// - `DIALOGUE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `DIALOGUE__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DIALOGUE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Runs every section's semantic validation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}
