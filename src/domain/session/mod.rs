//! Session module - the project context accumulated over a conversation.

mod aggregate;
mod blueprint;
mod message;
mod requirements;

pub use aggregate::{Session, MAX_CONFIDENCE};
pub use blueprint::{Blueprint, BlueprintComponent, TechStackEntry};
pub use message::{Message, MessageRole};
pub use requirements::{Constraint, ConstraintType, Requirement};
