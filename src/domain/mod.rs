//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `knowledge` - Read-only catalog of architectural patterns
//! - `decision` - Weighted pattern scoring and constraint adjustment
//! - `conflict` - Rule-based conflict detection, merge and resolution
//! - `conversation` - Conversation nodes and their transition table
//! - `session` - The session aggregate and its value types

pub mod conflict;
pub mod conversation;
pub mod decision;
pub mod foundation;
pub mod knowledge;
pub mod session;
