//! Retrying Session Store Adapter
//!
//! Wraps another store and retries saves that hit a revision conflict.
//! Backends report conflicts for transient contention as well as for real
//! races; a short retry absorbs the former, and the latter still surfaces
//! once the retries are spent.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::ConversationId;
use crate::ports::{SessionStore, SessionStoreError, VersionedSession};

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Session store wrapper that retries conflicted saves.
#[derive(Debug, Clone)]
pub struct RetryingSessionStore<S> {
    inner: S,
    max_retries: u32,
    retry_delay: Duration,
}

impl<S: SessionStore> RetryingSessionStore<S> {
    /// Wraps a store with the default retry policy.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Sets how many times a conflicted save is retried.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the pause between retries.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

#[async_trait]
impl<S: SessionStore> SessionStore for RetryingSessionStore<S> {
    async fn load(&self, id: &ConversationId) -> Result<VersionedSession, SessionStoreError> {
        self.inner.load(id).await
    }

    async fn save(
        &self,
        session: &ConversationSession,
        expected_revision: Option<u64>,
    ) -> Result<u64, SessionStoreError> {
        let mut attempt = 0;
        loop {
            match self.inner.save(session, expected_revision).await {
                Err(SessionStoreError::RevisionConflict { id, .. })
                    if attempt < self.max_retries =>
                {
                    attempt += 1;
                    tracing::warn!(
                        "Save of conversation {} hit a revision conflict, retry {}/{}",
                        id,
                        attempt,
                        self.max_retries
                    );
                    sleep(self.retry_delay).await;
                }
                other => return other,
            }
        }
    }
}
