//! Conversation session: everything one conversation carries between turns.
//!
//! # Design
//!
//! The session is a plain serializable aggregate. It never consults the
//! graph or the template; the orchestrator does that and feeds the results
//! back in. State history only grows: the current state is the last entry,
//! and every processed turn appends one, even when the conversation stayed
//! put.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::message::{Speaker, Utterance};
use crate::domain::foundation::{ConfigurationError, ConversationId, StateId, Timestamp, Treatment};
use crate::domain::slots::SlotFacts;

/// The per-conversation aggregate persisted between turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    id: ConversationId,
    treatment: Treatment,
    state_history: Vec<StateId>,
    transcript: Vec<Utterance>,
    facts: SlotFacts,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ConversationSession {
    /// Opens a new session: the welcome line is already on the transcript
    /// and the initial state is the first history entry.
    pub fn seeded(
        treatment: Treatment,
        initial_state: StateId,
        welcome: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            treatment,
            state_history: vec![initial_state],
            transcript: vec![Utterance::bot(welcome)],
            facts: SlotFacts::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn treatment(&self) -> Treatment {
        self.treatment
    }

    /// The state the conversation is currently in.
    ///
    /// Fails only on a corrupt session whose history was emptied outside
    /// this type.
    pub fn current_state(&self) -> Result<&StateId, ConfigurationError> {
        self.state_history
            .last()
            .ok_or(ConfigurationError::EmptyStateHistory)
    }

    pub fn state_history(&self) -> &[StateId] {
        &self.state_history
    }

    pub fn transcript(&self) -> &[Utterance] {
        &self.transcript
    }

    pub fn facts(&self) -> &SlotFacts {
        &self.facts
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// The most recent bot line, if any.
    pub fn last_bot_message(&self) -> Option<&str> {
        self.transcript
            .iter()
            .rev()
            .find(|utterance| utterance.is_bot())
            .map(|utterance| utterance.text())
    }

    /// Transcript plus the not-yet-recorded user line, trimmed to the most
    /// recent `window` entries. This is the context handed to the reply
    /// generator.
    pub fn windowed_history(&self, pending_user_text: &str, window: usize) -> Vec<Utterance> {
        let mut history: Vec<Utterance> = self.transcript.clone();
        history.push(Utterance::user(pending_user_text));
        let skip = history.len().saturating_sub(window);
        history.split_off(skip)
    }

    /// Folds this turn's observations into the accumulated facts.
    ///
    /// Already-recorded slots keep their value; facts only accumulate.
    pub fn merge_facts(&mut self, newly_observed: &SlotFacts) {
        self.facts.merge_new(newly_observed);
    }

    /// Records a completed turn: the user line, the bot reply, and the state
    /// the conversation is in afterwards.
    pub fn record_turn(
        &mut self,
        user_text: impl Into<String>,
        reply: impl Into<String>,
        new_state: StateId,
    ) {
        self.transcript.push(Utterance::user(user_text));
        self.transcript.push(Utterance::bot(reply));
        self.state_history.push(new_state);
        self.updated_at = Timestamp::now();
    }
}
