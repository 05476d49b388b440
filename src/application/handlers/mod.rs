//! Application handlers.
//!
//! Command and query handlers that load a session, run domain operations
//! through the orchestrator and persist the result.

mod get_session;
mod reset_session;
mod send_message;

pub use get_session::{GetSessionHandler, GetSessionQuery, SessionAccessError};
pub use reset_session::{ResetSessionCommand, ResetSessionHandler, ResetSessionResult};
pub use send_message::{SendMessageCommand, SendMessageError, SendMessageHandler, SendMessageResult};
