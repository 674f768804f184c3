//! Foundation module - Shared domain primitives.
//!
//! Contains the identifier newtypes, the treatment arm, the timestamp value
//! object, and the fatal configuration error type that the rest of the
//! dialogue domain is built from.

mod errors;
mod ids;
mod timestamp;
mod treatment;

pub use errors::ConfigurationError;
pub use ids::{ActionId, ConditionName, ConversationId, EdgeName, SlotId, StateId};
pub use timestamp::Timestamp;
pub use treatment::Treatment;
