//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port, plus the Generator built on top.
//!
//! ## Available Adapters
//!
//! - `AnthropicProvider` - Anthropic Claude models via the Messages API
//! - `MockAIProvider` - Configurable mock for testing and offline runs
//! - `ProviderGenerator` - Generator port over any provider, with retries

mod anthropic_provider;
mod mock_provider;
mod provider_generator;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider, DEFAULT_MODEL};
pub use mock_provider::{MockAIProvider, MockError, MockResponse, DEFAULT_MOCK_CONTENT};
pub use provider_generator::{
    extract_json, parse_json_response, structured_prompt, ProviderGenerator, RetryPolicy,
    STRUCTURED_TEMPERATURE,
};
