//! Ports - Interfaces for external dependencies.
//!
//! Ports define the contracts between the core and the outside world
//! (LLM providers, persistence). Adapters implement these ports.

mod ai_provider;
mod generator;
mod session_repository;

pub use ai_provider::{
    AIError, AIProvider, ChatMessage, ChatRole, CompletionRequest, CompletionResponse,
    FinishReason, ProviderInfo, TokenUsage,
};
pub use generator::{generate_as, Generator, OutputSchema, StructuredResponse};
pub use session_repository::{SessionRepository, SessionStoreError};
