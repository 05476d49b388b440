//! Conversation agent configuration

use serde::Deserialize;

use super::error::ConfigValidationError;

/// Thresholds that govern conversation progression.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Iteration ceiling; reaching it forces a decision.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Confidence needed to leave information gathering.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Messages included in prompts that carry history.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Number of patterns to recommend.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_iterations == 0 {
            return Err(ConfigValidationError::InvalidMaxIterations);
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigValidationError::InvalidMinConfidence(self.min_confidence));
        }
        if self.top_n == 0 {
            return Err(ConfigValidationError::InvalidTopN);
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            min_confidence: default_min_confidence(),
            history_limit: default_history_limit(),
            top_n: default_top_n(),
        }
    }
}

fn default_max_iterations() -> u32 {
    5
}

fn default_min_confidence() -> f64 {
    0.7
}

fn default_history_limit() -> usize {
    10
}

fn default_top_n() -> usize {
    3
}
