//! Errors raised while resolving a single transition.

use thiserror::Error;

use crate::domain::foundation::{ConditionName, ConfigurationError, EdgeName, StateId};

/// A resolution miss: the graph could not answer for this turn.
///
/// These are recoverable per turn. The orchestrator falls back to the
/// current state's static route instead of failing the conversation.
#[derive(Debug, Error)]
pub enum DialogueResolutionError {
    #[error("state `{state}` has no policy for edge `{edge}`")]
    MissingPolicy { state: StateId, edge: EdgeName },

    #[error("condition `{0}` is not defined")]
    UnknownCondition(ConditionName),
}

impl DialogueResolutionError {
    pub fn missing_policy(state: impl Into<StateId>, edge: impl Into<EdgeName>) -> Self {
        Self::MissingPolicy {
            state: state.into(),
            edge: edge.into(),
        }
    }
}

/// Everything a transition attempt can fail with.
///
/// Configuration errors are fatal for the request: asking about a state the
/// graph never declared means the caller's session is corrupt, and degrading
/// it would silently mask the defect. Resolution errors degrade to fallback.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Resolution(#[from] DialogueResolutionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_policy_names_state_and_edge() {
        let err = DialogueResolutionError::missing_policy("choice", "ghost");
        assert_eq!(err.to_string(), "state `choice` has no policy for edge `ghost`");
    }

    #[test]
    fn engine_error_is_transparent() {
        let err = EngineError::from(DialogueResolutionError::UnknownCondition(
            ConditionName::new("refund_gate"),
        ));
        assert_eq!(err.to_string(), "condition `refund_gate` is not defined");

        let err = EngineError::from(ConfigurationError::UnknownState(StateId::new("nowhere")));
        assert!(err.to_string().contains("nowhere"));
    }
}
