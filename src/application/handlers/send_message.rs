//! SendMessageHandler - runs one conversation turn and persists the session.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::application::orchestrator::{ConversationOrchestrator, TurnOutcome};
use crate::domain::conversation::ConversationNode;
use crate::domain::foundation::SessionId;
use crate::domain::session::Session;
use crate::ports::{SessionRepository, SessionStoreError};

/// Command to send a user message to a session.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// Target session. A new session is created when absent or unknown.
    pub session_id: Option<SessionId>,
    pub content: String,
}

impl SendMessageCommand {
    pub fn new(session_id: Option<SessionId>, content: impl Into<String>) -> Self {
        Self {
            session_id,
            content: content.into(),
        }
    }
}

/// Errors that can occur when sending a message.
#[derive(Debug, Error)]
pub enum SendMessageError {
    /// Message content is empty or whitespace only.
    #[error("Validation error: message content cannot be empty")]
    EmptyContent,

    /// The session exists but could not be read.
    #[error("Failed to load session: {0}")]
    LoadFailed(#[from] SessionStoreError),
}

/// Result of one conversation turn.
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    pub session_id: SessionId,
    pub reply: String,
    pub node: ConversationNode,
    pub waiting_for_user: bool,
    pub done: bool,
    /// False when the session could not be saved after the turn.
    pub persisted: bool,
}

/// Handler for user messages.
pub struct SendMessageHandler {
    repository: Arc<dyn SessionRepository>,
    orchestrator: Arc<ConversationOrchestrator>,
}

impl SendMessageHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        orchestrator: Arc<ConversationOrchestrator>,
    ) -> Self {
        Self {
            repository,
            orchestrator,
        }
    }

    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<SendMessageResult, SendMessageError> {
        // 1. Validate
        if cmd.content.trim().is_empty() {
            return Err(SendMessageError::EmptyContent);
        }

        // 2. Load or create
        let mut session = match cmd.session_id {
            Some(id) => match self.repository.load(&id).await? {
                Some(session) => session,
                None => {
                    info!(session_id = %id, "creating session");
                    Session::new(id)
                }
            },
            None => {
                let session = Session::new(SessionId::new());
                info!(session_id = %session.id(), "creating session");
                session
            }
        };

        // 3. Run the turn
        let outcome = self.orchestrator.handle_message(&mut session, &cmd.content).await;

        // 4. Persist; a failed save does not discard the reply
        let persisted = match self.repository.save(&session).await {
            Ok(()) => true,
            Err(e) => {
                warn!(session_id = %session.id(), error = %e, "failed to save session");
                false
            }
        };

        Ok(SendMessageResult::new(*session.id(), outcome, persisted))
    }
}

impl SendMessageResult {
    fn new(session_id: SessionId, outcome: TurnOutcome, persisted: bool) -> Self {
        Self {
            session_id,
            reply: outcome.reply,
            node: outcome.node,
            waiting_for_user: outcome.waiting_for_user,
            done: outcome.done,
            persisted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, ProviderGenerator, RetryPolicy};
    use crate::adapters::storage::InMemorySessionRepository;
    use crate::config::AgentConfig;
    use crate::domain::knowledge::StaticKnowledgeBase;
    use async_trait::async_trait;

    struct BrokenRepository {
        fail_load: bool,
    }

    #[async_trait]
    impl SessionRepository for BrokenRepository {
        async fn load(&self, _id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
            if self.fail_load {
                Err(SessionStoreError::DeserializationFailed("corrupt".to_string()))
            } else {
                Ok(None)
            }
        }

        async fn save(&self, _session: &Session) -> Result<(), SessionStoreError> {
            Err(SessionStoreError::IoError("disk full".to_string()))
        }
    }

    fn orchestrator() -> Arc<ConversationOrchestrator> {
        let provider = Arc::new(MockAIProvider::new());
        let generator = ProviderGenerator::new(provider).with_retry_policy(RetryPolicy::immediate(1));
        Arc::new(ConversationOrchestrator::new(
            Arc::new(generator),
            Arc::new(StaticKnowledgeBase::new()),
            AgentConfig::default(),
        ))
    }

    #[tokio::test]
    async fn creates_and_persists_new_session() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let handler = SendMessageHandler::new(repo.clone(), orchestrator());

        let result = handler
            .handle(SendMessageCommand::new(None, "A photo sharing app"))
            .await
            .unwrap();

        assert!(result.persisted);
        assert!(result.waiting_for_user);
        assert_eq!(result.node, ConversationNode::Priority);
        let stored = repo.load(&result.session_id).await.unwrap().unwrap();
        assert_eq!(stored.messages().len(), 3);
    }

    #[tokio::test]
    async fn continues_existing_session() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let handler = SendMessageHandler::new(repo.clone(), orchestrator());
        let first = handler
            .handle(SendMessageCommand::new(None, "A photo sharing app"))
            .await
            .unwrap();

        let second = handler
            .handle(SendMessageCommand::new(Some(first.session_id), "3"))
            .await
            .unwrap();

        assert_eq!(second.session_id, first.session_id);
        assert!(second.done);
        assert_eq!(repo.session_count().await, 1);
    }

    #[tokio::test]
    async fn rejects_blank_message() {
        let handler = SendMessageHandler::new(Arc::new(InMemorySessionRepository::new()), orchestrator());

        let result = handler.handle(SendMessageCommand::new(None, "   ")).await;

        assert!(matches!(result, Err(SendMessageError::EmptyContent)));
    }

    #[tokio::test]
    async fn save_failure_is_reported_not_raised() {
        let handler = SendMessageHandler::new(Arc::new(BrokenRepository { fail_load: false }), orchestrator());

        let result = handler
            .handle(SendMessageCommand::new(Some(SessionId::new()), "A photo sharing app"))
            .await
            .unwrap();

        assert!(!result.persisted);
        assert!(!result.reply.is_empty());
    }

    #[tokio::test]
    async fn load_failure_is_returned() {
        let handler = SendMessageHandler::new(Arc::new(BrokenRepository { fail_load: true }), orchestrator());

        let result = handler
            .handle(SendMessageCommand::new(Some(SessionId::new()), "hello"))
            .await;

        assert!(matches!(result, Err(SendMessageError::LoadFailed(_))));
    }
}
