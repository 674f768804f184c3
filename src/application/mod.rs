//! Application layer - the per-turn pipeline and conversation lifecycle.
//!
//! This layer orchestrates domain operations and coordinates between ports:
//! the `TurnProcessor` runs one turn end to end with per-stage degradation,
//! and `DialogueStart` seeds new conversations from the catalog.

mod start;
mod turn;

pub use start::DialogueStart;
pub use turn::{TurnOutcome, TurnProcessor};
