//! Dialogue module - the control graph and transition resolution.
//!
//! This module defines:
//! - The DialogueGraph of states, edges, policies, and shared conditions
//! - Load-time validation against the slot template
//! - The DialogueEngine that resolves one transition per turn

mod engine;
mod errors;
mod graph;

pub use engine::{DialogueEngine, Transition, MAX_CONDITION_DEPTH};
pub use errors::{DialogueResolutionError, EngineError};
pub use graph::{ConditionNode, DialogueGraph, PolicyNode, StateDef, CURRENT_STATE_SENTINEL};
