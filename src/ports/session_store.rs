//! Session Store Port - Interface for persisting conversation sessions.
//!
//! Sessions are stored whole under their conversation id with an optimistic
//! revision counter. Writers pass the revision they loaded; a mismatch means
//! another turn landed in between and the write is rejected.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::ConversationId;

/// A stored session together with the revision it was read at.
#[derive(Debug, Clone)]
pub struct VersionedSession {
    pub session: ConversationSession,
    pub revision: u64,
}

/// Errors that can occur during session storage operations
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Conversation already exists: {0}")]
    AlreadyExists(ConversationId),

    #[error("Conversation {id} was modified concurrently (expected revision {expected}, found {found})")]
    RevisionConflict {
        id: ConversationId,
        expected: u64,
        found: u64,
    },

    #[error("Session store backend error: {0}")]
    Backend(String),
}

impl SessionStoreError {
    /// Creates a Backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Port for loading and saving conversation sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session with its current revision.
    ///
    /// # Errors
    /// Returns `SessionStoreError::NotFound` if no such conversation exists.
    async fn load(&self, id: &ConversationId) -> Result<VersionedSession, SessionStoreError>;

    /// Persists a session and returns the new revision.
    ///
    /// Pass `None` to create a fresh conversation, or `Some(revision)` to
    /// update an existing one at the revision it was loaded at.
    ///
    /// # Errors
    /// - `AlreadyExists` when creating an id that is already stored
    /// - `NotFound` when updating an id that is not stored
    /// - `RevisionConflict` when the stored revision moved on
    async fn save(
        &self,
        session: &ConversationSession,
        expected_revision: Option<u64>,
    ) -> Result<u64, SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_error_reports_both_revisions() {
        let err = SessionStoreError::RevisionConflict {
            id: ConversationId::new(),
            expected: 3,
            found: 4,
        };
        let text = err.to_string();
        assert!(text.contains("expected revision 3"));
        assert!(text.contains("found 4"));
    }
}
