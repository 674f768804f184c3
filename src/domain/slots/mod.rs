//! Slot module - declared case facts and per-turn verdict handling.
//!
//! This module defines:
//! - The SlotTemplate with per-slot descriptions, links, and fallback patterns
//! - SlotFacts, the sparse true-only fact map accumulated per conversation
//! - The SlotTracker that expands check lists and validates raw verdicts

mod facts;
mod template;
mod tracker;

pub use facts::SlotFacts;
pub use template::{SlotDefinition, SlotDescriptor, SlotTemplate};
pub use tracker::{SlotTracker, SlotVerdicts};
