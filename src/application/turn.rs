//! Turn orchestration: one user message in, one reply out.
//!
//! The processor sequences the slot tracker, the dialogue engine, and the
//! reply generator, degrading stage by stage: classifier failures fall back
//! to pattern matching, resolution misses to the state's static route, and
//! generation failures to the action's canned line. A stage failure never
//! blocks the next stage; only configuration defects abort a turn.

use std::sync::Arc;

use crate::domain::catalog::{DialogueCatalog, ReplyCatalog};
use crate::domain::conversation::ConversationSession;
use crate::domain::dialogue::{DialogueEngine, EngineError, Transition};
use crate::domain::foundation::{ConfigurationError, StateId};
use crate::domain::slots::{SlotFacts, SlotTracker};
use crate::ports::{ClassificationRequest, GenerationRequest, ReplyGenerator, SlotClassifier};

/// Transcript entries handed to the generator, pending user line included.
const GENERATION_WINDOW: usize = 4;

/// Served only when an action has no reply entry, which a validated catalog
/// rules out.
const LAST_RESORT_REPLY: &str =
    "Sorry, I'm having trouble answering right now. Could you say that again?";

/// Outcome of one processed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    pub reply: String,
    pub new_state: StateId,
    pub is_final: bool,
}

/// Per-turn orchestrator over the dialogue catalog and the AI ports.
pub struct TurnProcessor {
    engine: DialogueEngine,
    tracker: SlotTracker,
    replies: Arc<ReplyCatalog>,
    classifier: Arc<dyn SlotClassifier>,
    generator: Arc<dyn ReplyGenerator>,
}

impl TurnProcessor {
    pub fn new(
        catalog: &DialogueCatalog,
        classifier: Arc<dyn SlotClassifier>,
        generator: Arc<dyn ReplyGenerator>,
    ) -> Self {
        Self {
            engine: DialogueEngine::new(catalog.graph().clone()),
            tracker: SlotTracker::new(catalog.template().clone(), catalog.graph().clone()),
            replies: catalog.replies().clone(),
            classifier,
            generator,
        }
    }

    /// Processes one user message against the session.
    ///
    /// On success the session carries the user line, the reply, the new
    /// state, and the merged facts.
    ///
    /// # Errors
    /// Returns `ConfigurationError` for a corrupt session or a catalog
    /// defect observed at runtime. Collaborator failures do not error; they
    /// degrade within their stage.
    pub async fn process(
        &self,
        session: &mut ConversationSession,
        user_text: &str,
    ) -> Result<TurnOutcome, ConfigurationError> {
        let current = session.current_state()?.clone();

        let newly_observed = self.observe_facts(session, &current, user_text).await?;
        session.merge_facts(&newly_observed);

        let transition = self.resolve(session, &current, &newly_observed)?;
        let reply = self.render_reply(session, user_text, &transition).await;

        session.record_turn(user_text, reply.clone(), transition.next_state.clone());

        Ok(TurnOutcome {
            reply,
            new_state: transition.next_state,
            is_final: transition.is_final,
        })
    }

    /// Classification stage: the provider first, patterns on any failure.
    async fn observe_facts(
        &self,
        session: &ConversationSession,
        current: &StateId,
        user_text: &str,
    ) -> Result<SlotFacts, ConfigurationError> {
        let slots = self.tracker.slots_to_check(current)?;
        if slots.is_empty() {
            // Nothing to ask about, so the provider is not consulted.
            return Ok(SlotFacts::new());
        }

        let descriptors = self.tracker.describe(&slots)?;
        let mut request = ClassificationRequest::new(user_text, descriptors);
        if let Some(last) = session.last_bot_message() {
            request = request.with_last_bot_message(last);
        }

        match self.classifier.classify(request).await {
            Ok(verdicts) => Ok(self.tracker.validate_and_filter(verdicts)),
            Err(error) => {
                tracing::warn!(
                    "Slot classification failed in state {}: {}, using pattern fallback",
                    current,
                    error
                );
                Ok(self.tracker.fallback_classify(user_text, &slots))
            }
        }
    }

    /// Resolution stage: the graph first, the static route when it misses.
    fn resolve(
        &self,
        session: &ConversationSession,
        current: &StateId,
        newly_observed: &SlotFacts,
    ) -> Result<Transition, ConfigurationError> {
        match self
            .engine
            .resolve_turn(current, session.facts(), newly_observed)
        {
            Ok(transition) => Ok(transition),
            Err(EngineError::Configuration(error)) => Err(error),
            Err(EngineError::Resolution(error)) => {
                tracing::warn!(
                    "Dialogue resolution failed in state {}: {}, taking the fallback route",
                    current,
                    error
                );
                self.engine.fallback_transition(current)
            }
        }
    }

    /// Generation stage: the generator first, the canned line on failure.
    async fn render_reply(
        &self,
        session: &ConversationSession,
        user_text: &str,
        transition: &Transition,
    ) -> String {
        let action = &transition.action;
        let Some(spec) = self.replies.get(action) else {
            tracing::error!("No reply entry for action {}", action);
            return LAST_RESORT_REPLY.to_string();
        };

        let request = GenerationRequest::new(action.clone(), session.treatment(), spec.guidance())
            .with_history(session.windowed_history(user_text, GENERATION_WINDOW));

        match self.generator.generate(request).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(
                    "Reply generation for action {} failed: {}, serving the canned line",
                    action,
                    error
                );
                spec.canned(session.treatment()).to_string()
            }
        }
    }
}
