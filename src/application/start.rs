//! Conversation start: seeding a new session from the catalog.

use std::sync::Arc;

use crate::domain::catalog::DialogueCatalog;
use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::Treatment;

/// Opens new conversations with the configured welcome line and entry state.
pub struct DialogueStart {
    catalog: Arc<DialogueCatalog>,
    fallback_treatment: Treatment,
}

impl DialogueStart {
    pub fn new(catalog: Arc<DialogueCatalog>, fallback_treatment: Treatment) -> Self {
        Self {
            catalog,
            fallback_treatment,
        }
    }

    /// Seeds a session in the requested treatment arm, or the configured
    /// fallback when the channel did not carry one.
    pub fn begin(&self, requested: Option<Treatment>) -> ConversationSession {
        let treatment = requested.unwrap_or(self.fallback_treatment);
        ConversationSession::seeded(
            treatment,
            self.catalog.initial_state().clone(),
            self.catalog.welcome_message(),
        )
    }
}
