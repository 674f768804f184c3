//! AI Adapters.
//!
//! Implementations of the `SlotClassifier` and `ReplyGenerator` ports.
//!
//! ## Available Adapters
//!
//! - `OpenAiSlotClassifier` / `OpenAiReplyGenerator` - OpenAI chat models
//! - `MockSlotClassifier` / `MockReplyGenerator` - Scripted mocks for testing

mod mock;
mod openai;
mod openai_classifier;
mod openai_generator;

pub use mock::{MockFailure, MockReplyGenerator, MockSlotClassifier};
pub use openai::OpenAiConfig;
pub use openai_classifier::OpenAiSlotClassifier;
pub use openai_generator::OpenAiReplyGenerator;
