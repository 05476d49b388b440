//! GetSessionHandler - Query handler for reading a session.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionRepository, SessionStoreError};

/// Errors for handlers that operate on an existing session.
#[derive(Debug, Error)]
pub enum SessionAccessError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Storage error: {0}")]
    Storage(#[from] SessionStoreError),
}

/// Query for a single session.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for session lookups.
pub struct GetSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<Session, SessionAccessError> {
        self.repository
            .load(&query.session_id)
            .await?
            .ok_or(SessionAccessError::NotFound(query.session_id))
    }
}
