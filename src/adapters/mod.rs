//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - OpenAI-backed slot classifier and reply generator, plus mocks
//! - `store` - Session persistence (in-memory, retry wrapper)
//! - `http` - Axum REST API

pub mod ai;
pub mod http;
pub mod store;
