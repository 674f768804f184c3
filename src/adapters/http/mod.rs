//! HTTP adapter - REST API for the dialogue engine.
//!
//! Exposes the conversation lifecycle via REST:
//! - `POST /api/conversations` - Open a conversation
//! - `POST /api/conversations/:id/messages` - Process one user message
//! - `GET /api/conversations/:id` - Fetch transcript and current state
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::AppState;
pub use routes::conversation_router;
