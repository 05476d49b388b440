//! Session Repository Port - persistence of session aggregates.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;

/// Errors that can occur during session persistence.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for SessionStoreError {
    fn from(err: std::io::Error) -> Self {
        SessionStoreError::IoError(err.to_string())
    }
}

/// Port for loading and saving sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Load a session.
    ///
    /// # Returns
    /// `Ok(None)` when no session exists for `id`.
    ///
    /// # Errors
    /// Any other failure; callers must not fabricate a fresh session on error.
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError>;

    /// Save a session, replacing any previous version. Idempotent.
    async fn save(&self, session: &Session) -> Result<(), SessionStoreError>;
}
