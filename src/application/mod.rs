//! Application layer - Orchestration, conversation nodes and handlers.
//!
//! This layer drives sessions through the conversation graph and coordinates
//! between the domain and the ports. Handlers are the entry points; the
//! orchestrator and nodes hold the turn logic.

pub mod handlers;
pub mod nodes;
pub mod orchestrator;
pub mod prompts;

pub use handlers::{
    GetSessionHandler, GetSessionQuery, ResetSessionCommand, ResetSessionHandler,
    ResetSessionResult, SendMessageCommand, SendMessageError, SendMessageHandler,
    SendMessageResult, SessionAccessError,
};
pub use orchestrator::{is_reset_command, ConversationOrchestrator, TurnOutcome, MAX_STEPS_PER_TURN};
