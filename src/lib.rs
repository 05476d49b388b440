//! Architect Agent - Conversational architecture advisor
//!
//! This crate guides a user through a multi-turn conversation and converges
//! on a software architecture recommendation. The core is a deterministic
//! decision engine (pattern scoring, constraint adjustment and rule-based
//! conflict detection) driven by a conversation state machine; a language
//! model only fills in extraction and prose, with deterministic fallbacks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
