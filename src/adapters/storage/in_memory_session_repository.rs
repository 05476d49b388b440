//! In-Memory Session Repository Adapter
//!
//! Keeps sessions in a map. Useful for testing and single-process runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionRepository, SessionStoreError};

/// In-memory storage for sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
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

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::MessageRole;

    #[tokio::test]
    async fn load_missing_session_returns_none() {
        let repo = InMemorySessionRepository::new();
        assert!(repo.load(&SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let repo = InMemorySessionRepository::new();
        let mut session = Session::new(SessionId::new());
        session.add_message(MessageRole::User, "Build a CRM");

        repo.save(&session).await.unwrap();
        let loaded = repo.load(session.id()).await.unwrap().unwrap();

        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn save_is_idempotent_and_replaces() {
        let repo = InMemorySessionRepository::new();
        let mut session = Session::new(SessionId::new());
        repo.save(&session).await.unwrap();
        repo.save(&session).await.unwrap();

        session.raise_confidence(0.5);
        repo.save(&session).await.unwrap();

        assert_eq!(repo.session_count().await, 1);
        let loaded = repo.load(session.id()).await.unwrap().unwrap();
        assert_eq!(loaded.confidence(), 0.5);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let repo = InMemorySessionRepository::new();
        repo.save(&Session::new(SessionId::new())).await.unwrap();
        repo.clear().await;
        assert_eq!(repo.session_count().await, 0);
    }
}
