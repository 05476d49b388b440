//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ConfigValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Temperature must be between 0.0 and 1.0, got {0}")]
    InvalidTemperature(f32),

    #[error("max_tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("max_retries must be at least 1")]
    InvalidRetries,

    #[error("min_confidence must be between 0.0 and 1.0, got {0}")]
    InvalidMinConfidence(f64),

    #[error("max_iterations must be at least 1")]
    InvalidMaxIterations,

    #[error("top_n must be at least 1")]
    InvalidTopN,

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}
