//! Decision module - deterministic scoring of architectural patterns.
//!
//! Given the user's priorities and the constraints collected so far, the
//! [`DecisionMatrix`] ranks every pattern in the knowledge base and turns
//! the viable ones into [`ArchitecturalDecision`]s.

mod impacts;
mod matrix;
mod priorities;
mod reasoning;

pub use impacts::constraint_impact;
pub use matrix::{
    ConstraintAdjustment, CriterionContribution, DecisionMatrix, ScoredPattern, DEFAULT_TOP_N,
    NEUTRAL_COEFFICIENT, VIABILITY_THRESHOLD,
};
pub use priorities::{
    resolve_weights, DecisionProfile, Priorities, PriorityRanking, WeightVector, DEFAULT_RANK,
    MAX_RANK, MIN_RANK,
};
pub use reasoning::{compose_reasoning, ScoreBand};

use serde::{Deserialize, Serialize};

/// A recommended pattern as recorded on the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitecturalDecision {
    /// Catalog key of the pattern.
    pub pattern: String,
    pub display_name: String,
    pub justification: String,
    /// The pattern's known drawbacks.
    pub trade_offs: Vec<String>,
    /// Other patterns recommended alongside this one.
    pub alternatives_considered: Vec<String>,
    pub score: f64,
}
