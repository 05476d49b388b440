//! Conflict module - tensions between requirements and constraints.
//!
//! Conflicts come from two producers: a fixed rule list evaluated here and
//! a model-assisted detector in the application layer. [`merge_conflicts`]
//! combines both; [`apply_resolution`] records the compromise a user picks.

mod merge;
mod resolution;
mod rules;

pub use merge::{merge_conflicts, normalized_explanation};
pub use resolution::{apply_resolution, is_deferral, AppliedResolution, ResolutionOutcome};
pub use rules::{detect_conflicts, ConflictRule, CONFLICT_RULES};

use serde::{Deserialize, Serialize};

/// A tension between requirements that needs a compromise.
///
/// # Invariants
///
/// - `resolved` implies `chosen_compromise` is one of `compromises`
/// - Conflicts are never removed from a session once recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Descriptions of the requirements involved.
    #[serde(default)]
    pub requirements: Vec<String>,
    pub explanation: String,
    #[serde(default)]
    pub compromises: Vec<String>,
    #[serde(default)]
    pub resolved: bool,
    #[serde(default)]
    pub chosen_compromise: Option<String>,
}

impl Conflict {
    pub fn new(
        requirements: Vec<String>,
        explanation: impl Into<String>,
        compromises: Vec<String>,
    ) -> Self {
        Self {
            requirements,
            explanation: explanation.into(),
            compromises,
            resolved: false,
            chosen_compromise: None,
        }
    }

    /// Resolves with the compromise at `index` (0-based).
    ///
    /// Returns false and leaves the conflict untouched when out of range.
    pub fn resolve_with(&mut self, index: usize) -> bool {
        match self.compromises.get(index) {
            Some(choice) => {
                self.chosen_compromise = Some(choice.clone());
                self.resolved = true;
                true
            }
            None => false,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Conflict {
        Conflict::new(
            vec!["Handle a million users".to_string()],
            "Scale versus budget",
            vec!["A".to_string(), "B".to_string()],
        )
    }

    #[test]
    fn new_conflict_is_open() {
        let c = sample();
        assert!(c.is_open());
        assert!(c.chosen_compromise.is_none());
    }

    #[test]
    fn resolve_with_records_choice() {
        let mut c = sample();
        assert!(c.resolve_with(1));
        assert!(c.resolved);
        assert_eq!(c.chosen_compromise.as_deref(), Some("B"));
    }

    #[test]
    fn resolve_with_out_of_range_is_noop() {
        let mut c = sample();
        assert!(!c.resolve_with(2));
        assert_eq!(c, sample());
    }

    #[test]
    fn model_output_without_flags_deserializes_open() {
        let c: Conflict = serde_json::from_str(
            r#"{"explanation": "Realtime vs batch", "compromises": ["x"]}"#,
        )
        .unwrap();
        assert!(c.is_open());
        assert!(c.requirements.is_empty());
    }
}
