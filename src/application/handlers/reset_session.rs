//! ResetSessionHandler - Command handler for restarting a session.

use std::sync::Arc;

use tracing::warn;

use super::get_session::SessionAccessError;
use crate::application::orchestrator::{ConversationOrchestrator, TurnOutcome};
use crate::domain::foundation::SessionId;
use crate::ports::SessionRepository;

/// Command to reset a session back to intake.
#[derive(Debug, Clone)]
pub struct ResetSessionCommand {
    pub session_id: SessionId,
}

/// Result of a reset.
#[derive(Debug, Clone)]
pub struct ResetSessionResult {
    pub outcome: TurnOutcome,
    pub persisted: bool,
}

/// Handler for explicit resets.
pub struct ResetSessionHandler {
    repository: Arc<dyn SessionRepository>,
    orchestrator: Arc<ConversationOrchestrator>,
}

impl ResetSessionHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        orchestrator: Arc<ConversationOrchestrator>,
    ) -> Self {
        Self {
            repository,
            orchestrator,
        }
    }

    pub async fn handle(&self, cmd: ResetSessionCommand) -> Result<ResetSessionResult, SessionAccessError> {
        // 1. Load
        let mut session = self
            .repository
            .load(&cmd.session_id)
            .await?
            .ok_or(SessionAccessError::NotFound(cmd.session_id))?;

        // 2. Reset
        let outcome = self.orchestrator.reset(&mut session);

        // 3. Persist
        let persisted = match self.repository.save(&session).await {
            Ok(()) => true,
            Err(e) => {
                warn!(session_id = %cmd.session_id, error = %e, "failed to save reset session");
                false
            }
        };

        Ok(ResetSessionResult { outcome, persisted })
    }
}
