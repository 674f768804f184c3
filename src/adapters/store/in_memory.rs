//! In-Memory Session Store Adapter
//!
//! Stores conversation sessions in memory with the same optimistic
//! revision checks a real backend would enforce. Useful for testing and
//! development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::ConversationId;
use crate::ports::{SessionStore, SessionStoreError, VersionedSession};

/// In-memory storage for conversation sessions
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<ConversationId, (ConversationSession, u64)>>>,
}

impl InMemorySessionStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clear all stored sessions (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// Get the number of stored sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &ConversationId) -> Result<VersionedSession, SessionStoreError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .map(|(session, revision)| VersionedSession {
                session: session.clone(),
                revision: *revision,
            })
            .ok_or(SessionStoreError::NotFound(*id))
    }

    async fn save(
        &self,
        session: &ConversationSession,
        expected_revision: Option<u64>,
    ) -> Result<u64, SessionStoreError> {
        let id = *session.id();
        let mut sessions = self.sessions.write().await;

        match expected_revision {
            None => {
                if sessions.contains_key(&id) {
                    return Err(SessionStoreError::AlreadyExists(id));
                }
                sessions.insert(id, (session.clone(), 1));
                Ok(1)
            }
            Some(expected) => {
                let Some((_, found)) = sessions.get(&id) else {
                    return Err(SessionStoreError::NotFound(id));
                };
                if *found != expected {
                    return Err(SessionStoreError::RevisionConflict {
                        id,
                        expected,
                        found: *found,
                    });
                }
                let revision = expected + 1;
                sessions.insert(id, (session.clone(), revision));
                Ok(revision)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{StateId, Treatment};

    fn session() -> ConversationSession {
        ConversationSession::seeded(
            Treatment::Neutral,
            StateId::new("intake"),
            "Hi! How can I help?",
        )
    }

    #[tokio::test]
    async fn create_then_load_round_trips() {
        let store = InMemorySessionStore::new();
        let session = session();

        let revision = store.save(&session, None).await.unwrap();
        assert_eq!(revision, 1);

        let loaded = store.load(session.id()).await.unwrap();
        assert_eq!(loaded.revision, 1);
        assert_eq!(loaded.session, session);
    }

    #[tokio::test]
    async fn creating_the_same_id_twice_is_rejected() {
        let store = InMemorySessionStore::new();
        let session = session();

        store.save(&session, None).await.unwrap();
        let result = store.save(&session, None).await;
        assert!(matches!(result, Err(SessionStoreError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn update_bumps_the_revision() {
        let store = InMemorySessionStore::new();
        let mut session = session();
        store.save(&session, None).await.unwrap();

        session.record_turn(
            "it never arrived",
            "Sorry to hear that!",
            StateId::new("need_order_number"),
        );
        let revision = store.save(&session, Some(1)).await.unwrap();
        assert_eq!(revision, 2);

        let loaded = store.load(session.id()).await.unwrap();
        assert_eq!(loaded.session.transcript().len(), 3);
    }

    #[tokio::test]
    async fn stale_revision_is_a_conflict() {
        let store = InMemorySessionStore::new();
        let session = session();
        store.save(&session, None).await.unwrap();
        store.save(&session, Some(1)).await.unwrap();

        let result = store.save(&session, Some(1)).await;
        assert!(matches!(
            result,
            Err(SessionStoreError::RevisionConflict {
                expected: 1,
                found: 2,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn updating_a_missing_conversation_is_not_found() {
        let store = InMemorySessionStore::new();
        let result = store.save(&session(), Some(1)).await;
        assert!(matches!(result, Err(SessionStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn loading_a_missing_conversation_is_not_found() {
        let store = InMemorySessionStore::new();
        let id = ConversationId::new();
        let result = store.load(&id).await;
        assert!(matches!(result, Err(SessionStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let store = InMemorySessionStore::new();
        store.save(&session(), None).await.unwrap();
        assert_eq!(store.session_count().await, 1);

        store.clear().await;
        assert_eq!(store.session_count().await, 0);
    }
}
