//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ARCHITECT_AGENT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use architect_agent::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model);
//! ```

mod agent;
mod ai;
mod error;
mod logging;
mod storage;

pub use agent::AgentConfig;
pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ConfigValidationError};
pub use logging::LoggingConfig;
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults; only the Anthropic API key is required when
/// the Anthropic provider is selected.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// AI provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Conversation thresholds
    #[serde(default)]
    pub agent: AgentConfig,

    /// Session storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ARCHITECT_AGENT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ARCHITECT_AGENT__AI__ANTHROPIC_API_KEY=...` -> `ai.anthropic_api_key = ...`
    /// - `ARCHITECT_AGENT__AGENT__MAX_ITERATIONS=8` -> `agent.max_iterations = 8`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ARCHITECT_AGENT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigValidationError` found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.ai.validate()?;
        self.agent.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("ARCHITECT_AGENT__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
    }

    fn clear_env() {
        for key in [
            "ARCHITECT_AGENT__AI__ANTHROPIC_API_KEY",
            "ARCHITECT_AGENT__AI__PROVIDER",
            "ARCHITECT_AGENT__AGENT__MAX_ITERATIONS",
            "ARCHITECT_AGENT__AGENT__MIN_CONFIDENCE",
            "ARCHITECT_AGENT__STORAGE__BACKEND",
            "ARCHITECT_AGENT__STORAGE__DATA_DIR",
            "ARCHITECT_AGENT__LOGGING__JSON",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        let key = config.ai.anthropic_api_key.as_ref().unwrap();
        assert_eq!(key.expose_secret(), "sk-ant-xxx");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_apply_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.agent, AgentConfig::default());
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("ARCHITECT_AGENT__AGENT__MAX_ITERATIONS", "8");
        env::set_var("ARCHITECT_AGENT__AGENT__MIN_CONFIDENCE", "0.8");
        env::set_var("ARCHITECT_AGENT__STORAGE__BACKEND", "file");
        env::set_var("ARCHITECT_AGENT__STORAGE__DATA_DIR", "/tmp/sessions");
        env::set_var("ARCHITECT_AGENT__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.agent.max_iterations, 8);
        assert_eq!(config.agent.min_confidence, 0.8);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.data_dir.to_str(), Some("/tmp/sessions"));
        assert!(config.logging.json);
    }

    #[test]
    fn test_mock_provider_validates_without_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("ARCHITECT_AGENT__AI__PROVIDER", "mock");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.provider, AiProvider::Mock);
        assert!(config.validate().is_ok());
    }
}
