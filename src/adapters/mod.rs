//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - LLM providers and the provider-backed generator
//! - `storage` - Session repositories (in-memory, YAML files)

pub mod ai;
pub mod storage;
