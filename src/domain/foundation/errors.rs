//! Shared error types for catalog loading and graph lookups.

use thiserror::Error;

use super::ids::{ActionId, ConditionName, EdgeName, SlotId, StateId};
use super::treatment::Treatment;

/// Fatal configuration faults.
///
/// Everything in this enum means the shipped catalog (or the caller's use of
/// it) is broken. These are raised at load time where possible, and on first
/// use otherwise; they are never recovered into a degraded turn.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A catalog document could not be read from disk.
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A catalog document is not valid JSON for its expected shape.
    #[error("failed to parse {document}: {source}")]
    Parse {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    /// A lookup named a dialogue state the graph does not declare.
    #[error("unknown dialogue state `{0}`")]
    UnknownState(StateId),

    /// A catalog document references a slot the template does not declare.
    #[error("{context} references undeclared slot `{slot}`")]
    UnknownSlot { context: String, slot: SlotId },

    /// A policy references a condition the arena does not declare.
    #[error("{context} references undeclared condition `{condition}`")]
    UnknownCondition {
        context: String,
        condition: ConditionName,
    },

    /// An edge can be selected but has no policy to resolve it.
    #[error("state `{state}`: edge `{edge}` has no policy")]
    MissingEdgePolicy { state: StateId, edge: EdgeName },

    /// Two edges of one state declare the same transition combination.
    #[error("state `{state}`: duplicate transition combination [{combination}]")]
    DuplicateCombination { state: StateId, combination: String },

    /// A fallback pattern failed to compile.
    #[error("invalid fallback pattern for slot `{slot}`: {source}")]
    InvalidPattern {
        slot: SlotId,
        #[source]
        source: regex::Error,
    },

    /// Following condition references revisits a node.
    #[error("condition references form a cycle through `{0}`")]
    ConditionCycle(ConditionName),

    /// Condition resolution recursed past the safety limit.
    #[error("condition resolution exceeded depth limit {limit}")]
    ConditionDepthExceeded { limit: usize },

    /// An action has no reply content for one of the treatment arms.
    #[error("action `{action}` has no reply content for treatment `{treatment}`")]
    MissingReply {
        action: ActionId,
        treatment: Treatment,
    },

    /// A turn was requested for a conversation with no seeded state.
    #[error("dialogue-state history is empty; conversations must be seeded with an initial state")]
    EmptyStateHistory,

    /// Any other structural fault found while validating the catalog.
    #[error("{0}")]
    Invalid(String),
}

impl ConfigurationError {
    /// Creates an Io error.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a Parse error for the named document.
    pub fn parse(document: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            document: document.into(),
            source,
        }
    }

    /// Creates an UnknownSlot error.
    pub fn unknown_slot(context: impl Into<String>, slot: SlotId) -> Self {
        Self::UnknownSlot {
            context: context.into(),
            slot,
        }
    }

    /// Creates an UnknownCondition error.
    pub fn unknown_condition(context: impl Into<String>, condition: ConditionName) -> Self {
        Self::UnknownCondition {
            context: context.into(),
            condition,
        }
    }

    /// Creates a generic validation error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
