//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SlotClassifier` - Per-turn slot classification of the user message
//! - `ReplyGenerator` - Rendering a reply action as natural language
//! - `SessionStore` - Persisting conversation sessions with optimistic
//!   revisions

mod reply_generator;
mod session_store;
mod slot_classifier;

pub use reply_generator::{GenerationError, GenerationRequest, ReplyGenerator};
pub use session_store::{SessionStore, SessionStoreError, VersionedSession};
pub use slot_classifier::{ClassificationError, ClassificationRequest, SlotClassifier};
