//! Conversation module - the progression of an advisory session.

mod node;

pub use node::{ConversationNode, Gate};
