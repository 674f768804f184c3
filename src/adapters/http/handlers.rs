//! HTTP handlers for the conversation endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{DialogueStart, TurnProcessor};
use crate::domain::catalog::DialogueCatalog;
use crate::domain::foundation::ConversationId;
use crate::ports::{SessionStore, SessionStoreError};

use super::dto::{
    ConversationCreatedResponse, ConversationResponse, CreateConversationRequest, ErrorResponse,
    HealthResponse, PostMessageRequest, TranscriptEntry, TurnResponse,
};

/// Application state for conversation endpoints.
#[derive(Clone)]
pub struct AppState {
    /// Validated dialogue catalog
    pub catalog: Arc<DialogueCatalog>,
    /// Conversation opener
    pub start: Arc<DialogueStart>,
    /// Per-turn pipeline
    pub processor: Arc<TurnProcessor>,
    /// Session persistence (injected)
    pub store: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(
        catalog: Arc<DialogueCatalog>,
        start: Arc<DialogueStart>,
        processor: Arc<TurnProcessor>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            catalog,
            start,
            processor,
            store,
        }
    }
}

/// Open a new conversation.
///
/// POST /api/conversations
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(request): Json<CreateConversationRequest>,
) -> Response {
    let session = state.start.begin(request.treatment);

    match state.store.save(&session, None).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(ConversationCreatedResponse {
                conversation_id: session.id().to_string(),
                reply: state.catalog.welcome_message().to_string(),
                state: state.catalog.initial_state().to_string(),
                treatment: session.treatment(),
            }),
        )
            .into_response(),
        Err(error) => store_error_response(error),
    }
}

/// Process one user message.
///
/// POST /api/conversations/:id/messages
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PostMessageRequest>,
) -> Response {
    let Ok(conversation_id) = id.parse::<ConversationId>() else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid conversation id");
    };

    let text = request.text.trim();
    if text.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Message text cannot be empty");
    }

    let mut versioned = match state.store.load(&conversation_id).await {
        Ok(versioned) => versioned,
        Err(error) => return store_error_response(error),
    };

    let outcome = match state.processor.process(&mut versioned.session, text).await {
        Ok(outcome) => outcome,
        Err(error) => {
            tracing::error!(
                "Turn processing failed for conversation {}: {}",
                conversation_id,
                error
            );
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Dialogue configuration error",
            );
        }
    };

    if let Err(error) = state
        .store
        .save(&versioned.session, Some(versioned.revision))
        .await
    {
        return store_error_response(error);
    }

    (
        StatusCode::OK,
        Json(TurnResponse {
            conversation_id: conversation_id.to_string(),
            reply: outcome.reply,
            state: outcome.new_state.to_string(),
            is_final: outcome.is_final,
        }),
    )
        .into_response()
}

/// Fetch a conversation's transcript and current state.
///
/// GET /api/conversations/:id
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(conversation_id) = id.parse::<ConversationId>() else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid conversation id");
    };

    let versioned = match state.store.load(&conversation_id).await {
        Ok(versioned) => versioned,
        Err(error) => return store_error_response(error),
    };
    let session = versioned.session;

    let current = match session.current_state() {
        Ok(current) => current.clone(),
        Err(error) => {
            tracing::error!("Conversation {} is corrupt: {}", conversation_id, error);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Corrupt conversation");
        }
    };

    (
        StatusCode::OK,
        Json(ConversationResponse {
            conversation_id: conversation_id.to_string(),
            treatment: session.treatment(),
            state: current.to_string(),
            is_final: state.catalog.graph().is_final(&current),
            transcript: session
                .transcript()
                .iter()
                .map(|utterance| TranscriptEntry {
                    speaker: utterance.speaker(),
                    text: utterance.text().to_string(),
                })
                .collect(),
        }),
    )
        .into_response()
}

/// Liveness probe.
///
/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn store_error_response(error: SessionStoreError) -> Response {
    match error {
        SessionStoreError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            format!("Conversation not found: {id}"),
        ),
        SessionStoreError::RevisionConflict { .. } => error_response(
            StatusCode::CONFLICT,
            "Conversation was modified concurrently, please retry",
        ),
        error => {
            tracing::error!("Session store failure: {}", error);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Session store failure")
        }
    }
}
