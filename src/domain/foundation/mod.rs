//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the architecture advisor.

mod errors;
mod ids;
mod priority;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{MessageId, SessionId};
pub use priority::Priority;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
