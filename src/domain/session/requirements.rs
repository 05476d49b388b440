//! Requirements and constraints gathered during the conversation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Priority, ValidationError};

/// Something the system must do or be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(default = "default_category")]
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
}

impl Requirement {
    /// Creates a requirement, rejecting an empty description.
    pub fn new(
        category: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::empty_field("description"));
        }
        Ok(Self {
            category: category.into(),
            description,
            priority,
        })
    }

    /// Case-insensitive substring check against the description.
    pub fn mentions_any(&self, needles: &[&str]) -> bool {
        let lower = self.description.to_lowercase();
        needles.iter().any(|needle| lower.contains(needle))
    }
}

fn default_category() -> String {
    "general".to_string()
}

/// The fixed constraint vocabulary.
///
/// Anything a model produces outside the vocabulary lands in `Other`,
/// which carries no scoring impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    Budget,
    Timeline,
    Team,
    Compliance,
    Technical,
    #[serde(other)]
    Other,
}

impl ConstraintType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintType::Budget => "budget",
            ConstraintType::Timeline => "timeline",
            ConstraintType::Team => "team",
            ConstraintType::Compliance => "compliance",
            ConstraintType::Technical => "technical",
            ConstraintType::Other => "other",
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A limit the architecture has to live within.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Priority,
}

impl Constraint {
    pub fn new(
        constraint_type: ConstraintType,
        description: impl Into<String>,
        severity: Priority,
    ) -> Self {
        Self {
            constraint_type,
            description: description.into(),
            severity,
        }
    }

    /// True when this is a constraint of `kind` with high or critical severity.
    pub fn is_pressing(&self, kind: ConstraintType) -> bool {
        self.constraint_type == kind && self.severity.is_pressing()
    }
}
