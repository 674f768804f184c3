//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `slots` - Slot template, accumulated facts, and per-turn verdict handling
//! - `dialogue` - The control graph and transition resolution
//! - `conversation` - The per-conversation session aggregate and transcript
//! - `catalog` - Loading and cross-validating the dialogue configuration

pub mod catalog;
pub mod conversation;
pub mod dialogue;
pub mod foundation;
pub mod slots;
