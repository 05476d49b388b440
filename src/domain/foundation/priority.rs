//! Priority / severity scale shared by requirements and constraints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance of a requirement, or severity of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Multiplier applied to a constraint's impact when scoring patterns.
    pub fn severity_multiplier(&self) -> f64 {
        match self {
            Priority::Critical => 1.5,
            Priority::High => 1.2,
            Priority::Medium => 1.0,
            Priority::Low => 0.7,
        }
    }

    /// True for `High` and `Critical`.
    pub fn is_pressing(&self) -> bool {
        matches!(self, Priority::High | Priority::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_multipliers_match_scale() {
        assert_eq!(Priority::Critical.severity_multiplier(), 1.5);
        assert_eq!(Priority::High.severity_multiplier(), 1.2);
        assert_eq!(Priority::Medium.severity_multiplier(), 1.0);
        assert_eq!(Priority::Low.severity_multiplier(), 0.7);
    }

    #[test]
    fn only_high_and_critical_are_pressing() {
        assert!(Priority::Critical.is_pressing());
        assert!(Priority::High.is_pressing());
        assert!(!Priority::Medium.is_pressing());
        assert!(!Priority::Low.is_pressing());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::Critical).unwrap(), "\"critical\"");
        let parsed: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Priority::High);
    }

    #[test]
    fn default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
