//! Bot behavior configuration.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::foundation::Treatment;

/// Dialogue behavior knobs independent of any one conversation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Treatment arm applied when a conversation does not request one
    pub treatment_fallback: Treatment,

    /// Directory holding the dialogue catalog documents.
    /// When unset the compiled-in catalog is used.
    pub data_dir: Option<PathBuf>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            treatment_fallback: Treatment::Empathetic,
            data_dir: None,
        }
    }
}
