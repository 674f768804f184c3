//! Route configuration for conversation endpoints.
//!
//! Configures the Axum router with the conversation API routes.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_conversation, get_conversation, health, post_message, AppState,
};

/// Creates the conversation router with all endpoints.
///
/// Routes:
/// - `POST /api/conversations` - Open a conversation, returns the welcome line
/// - `POST /api/conversations/:id/messages` - Process one user message
/// - `GET /api/conversations/:id` - Fetch transcript and current state
/// - `GET /health` - Liveness probe
pub fn conversation_router() -> Router<AppState> {
    Router::new()
        .route("/api/conversations", post(create_conversation))
        .route("/api/conversations/:id/messages", post(post_message))
        .route("/api/conversations/:id", get(get_conversation))
        .route("/health", get(health))
}
