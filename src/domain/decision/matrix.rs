//! Decision Matrix - weighted pattern scoring with constraint adjustment.

use serde::{Deserialize, Serialize};

use super::impacts::constraint_impact;
use super::priorities::{resolve_weights, Priorities, WeightVector};
use super::reasoning::compose_reasoning;
use super::ArchitecturalDecision;
use crate::domain::knowledge::{Criterion, PatternCatalog};
use crate::domain::session::{Constraint, ConstraintType};

/// Minimum final score for a pattern to be recommended.
pub const VIABILITY_THRESHOLD: f64 = 40.0;

/// Coefficient used when a pattern does not rate a criterion.
pub const NEUTRAL_COEFFICIENT: f64 = 50.0;

/// Default number of recommendations.
pub const DEFAULT_TOP_N: usize = 3;

/// Length of the description prefix kept in adjustment labels.
const LABEL_DESCRIPTION_CHARS: usize = 30;

/// One criterion's share of a base score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionContribution {
    pub criterion: Criterion,
    pub coefficient: f64,
    pub weight: f64,
    /// `coefficient * weight`
    pub weighted: f64,
}

/// Signed score change caused by one constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintAdjustment {
    /// `"{type}:{description prefix}"`
    pub label: String,
    pub constraint_type: ConstraintType,
    pub delta: f64,
}

/// Result of scoring one pattern. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPattern {
    /// Catalog key, or the requested name when the pattern is unknown.
    pub name: String,
    pub display_name: String,
    pub base_score: f64,
    pub breakdown: Vec<CriterionContribution>,
    pub adjustments: Vec<ConstraintAdjustment>,
    pub final_score: f64,
    pub viable: bool,
    pub reasoning: String,
}

impl ScoredPattern {
    fn unknown(name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: name.to_string(),
            base_score: 0.0,
            breakdown: Vec::new(),
            adjustments: Vec::new(),
            final_score: 0.0,
            viable: false,
            reasoning: format!("Unknown pattern: {}", name),
        }
    }

    /// Sum of all constraint adjustments.
    pub fn total_adjustment(&self) -> f64 {
        self.adjustments.iter().map(|a| a.delta).sum()
    }
}

/// Scores catalog patterns against priorities and constraints.
///
/// Stateless apart from the borrowed catalog; identical inputs always give
/// identical output.
pub struct DecisionMatrix<'a> {
    catalog: &'a dyn PatternCatalog,
    threshold: f64,
}

impl<'a> DecisionMatrix<'a> {
    pub fn new(catalog: &'a dyn PatternCatalog) -> Self {
        Self {
            catalog,
            threshold: VIABILITY_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Scores a single pattern.
    ///
    /// # Algorithm
    /// base = Σ coefficient(criterion) × weight(criterion)
    /// final = max(0, base + Σ impact(constraint, pattern) × severity multiplier)
    ///
    /// # Edge Cases
    /// - Unknown pattern: score 0, empty breakdown, not viable
    /// - Constraint type without an impact row: contributes 0
    /// - No upper clamp on the final score
    pub fn score(
        &self,
        pattern: &str,
        priorities: Option<&Priorities>,
        constraints: &[Constraint],
    ) -> ScoredPattern {
        let weights = resolve_weights(priorities);
        self.score_weighted(pattern, &weights, constraints)
    }

    /// Scores every catalog pattern, best first. Ties keep catalog order.
    pub fn score_all(
        &self,
        priorities: Option<&Priorities>,
        constraints: &[Constraint],
    ) -> Vec<ScoredPattern> {
        let weights = resolve_weights(priorities);
        let mut scored: Vec<ScoredPattern> = self
            .catalog
            .all_pattern_names()
            .into_iter()
            .map(|name| self.score_weighted(name, &weights, constraints))
            .collect();
        scored.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored
    }

    /// The best `n` viable patterns. Never padded with non-viable ones.
    pub fn top_n(
        &self,
        n: usize,
        priorities: Option<&Priorities>,
        constraints: &[Constraint],
    ) -> Vec<ScoredPattern> {
        self.score_all(priorities, constraints)
            .into_iter()
            .filter(|p| p.viable)
            .take(n)
            .collect()
    }

    /// Converts scored patterns into recorded decisions.
    ///
    /// Trade-offs are the pattern's cons; alternatives are the other
    /// patterns in `scored`.
    pub fn to_architectural_decisions(&self, scored: &[ScoredPattern]) -> Vec<ArchitecturalDecision> {
        scored
            .iter()
            .map(|pattern| {
                let trade_offs = self
                    .catalog
                    .lookup_pattern(&pattern.name)
                    .map(|p| p.cons.iter().map(|c| c.to_string()).collect())
                    .unwrap_or_default();
                let alternatives = scored
                    .iter()
                    .filter(|other| other.name != pattern.name)
                    .map(|other| other.name.clone())
                    .collect();
                ArchitecturalDecision {
                    pattern: pattern.name.clone(),
                    display_name: pattern.display_name.clone(),
                    justification: pattern.reasoning.clone(),
                    trade_offs,
                    alternatives_considered: alternatives,
                    score: pattern.final_score,
                }
            })
            .collect()
    }

    fn score_weighted(
        &self,
        pattern: &str,
        weights: &WeightVector,
        constraints: &[Constraint],
    ) -> ScoredPattern {
        let Some(profile) = self.catalog.lookup_pattern(pattern) else {
            return ScoredPattern::unknown(pattern);
        };

        let breakdown: Vec<CriterionContribution> = weights
            .iter()
            .map(|(criterion, weight)| {
                let coefficient = profile.coefficient(criterion).unwrap_or(NEUTRAL_COEFFICIENT);
                CriterionContribution {
                    criterion,
                    coefficient,
                    weight,
                    weighted: coefficient * weight,
                }
            })
            .collect();
        let base: f64 = breakdown.iter().map(|c| c.weighted).sum();

        let adjustments: Vec<ConstraintAdjustment> = constraints
            .iter()
            .map(|constraint| ConstraintAdjustment {
                label: adjustment_label(constraint),
                constraint_type: constraint.constraint_type,
                delta: constraint_impact(constraint.constraint_type, profile.key)
                    * constraint.severity.severity_multiplier(),
            })
            .collect();
        let total_adjustment: f64 = adjustments.iter().map(|a| a.delta).sum();

        let final_score = (base + total_adjustment).max(0.0);
        let reasoning = compose_reasoning(profile.name, final_score, &breakdown, &adjustments);

        ScoredPattern {
            name: profile.key.to_string(),
            display_name: profile.name.to_string(),
            base_score: round2(base),
            breakdown,
            adjustments,
            final_score: round2(final_score),
            viable: final_score >= self.threshold,
            reasoning,
        }
    }
}

fn adjustment_label(constraint: &Constraint) -> String {
    let prefix: String = constraint
        .description
        .chars()
        .take(LABEL_DESCRIPTION_CHARS)
        .collect();
    format!("{}:{}", constraint.constraint_type, prefix)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::decision::DecisionProfile;
    use crate::domain::foundation::Priority;
    use crate::domain::knowledge::StaticKnowledgeBase;

    fn critical_budget() -> Vec<Constraint> {
        vec![Constraint::new(
            ConstraintType::Budget,
            "Very limited seed funding",
            Priority::Critical,
        )]
    }

    #[test]
    fn balanced_microservices_base_score() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        let scored = matrix.score("microservices", None, &[]);

        assert_eq!(scored.base_score, 65.0);
        assert_eq!(scored.final_score, 65.0);
        assert_eq!(scored.breakdown.len(), 5);
        assert!(scored.viable);
    }

    #[test]
    fn critical_budget_penalizes_microservices_by_45() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        let scored = matrix.score("microservices", None, &critical_budget());

        assert_eq!(scored.final_score, 20.0);
        assert!(!scored.viable);
        assert_eq!(scored.adjustments.len(), 1);
        assert_eq!(scored.adjustments[0].delta, -45.0);
        assert_eq!(scored.adjustments[0].label, "budget:Very limited seed funding");
    }

    #[test]
    fn critical_budget_keeps_modular_monolith_viable() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        let scored = matrix.score("modular_monolith", None, &critical_budget());

        assert_eq!(scored.final_score, 60.5);
        assert!(scored.viable);
    }

    #[test]
    fn final_score_is_clamped_at_zero() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        let constraints: Vec<Constraint> = (0..4)
            .map(|_| Constraint::new(ConstraintType::Timeline, "Launch next week", Priority::Critical))
            .collect();
        let scored = matrix.score("microservices", None, &constraints);

        assert_eq!(scored.final_score, 0.0);
        assert!(scored.total_adjustment() < -100.0);
    }

    #[test]
    fn unknown_pattern_scores_zero_without_panicking() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        let scored = matrix.score("blockchain_mesh", None, &critical_budget());

        assert_eq!(scored.final_score, 0.0);
        assert!(scored.breakdown.is_empty());
        assert!(!scored.viable);
    }

    #[test]
    fn adjustment_label_truncates_long_descriptions() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        let constraints = vec![Constraint::new(
            ConstraintType::Team,
            "Only two backend engineers available for the first year",
            Priority::Medium,
        )];
        let scored = matrix.score("cqrs", None, &constraints);

        assert_eq!(scored.adjustments[0].label, "team:Only two backend engineers av");
    }

    #[test]
    fn score_all_is_sorted_descending() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        let scored = matrix.score_all(None, &critical_budget());

        assert_eq!(scored.len(), 6);
        for pair in scored.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score);
        }
        assert_eq!(scored[0].name, "monolith");
        assert_eq!(scored.last().unwrap().name, "microservices");
    }

    #[test]
    fn ties_keep_catalog_order() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        // Balanced with no constraints: monolith, microservices and cqrs all score 65.
        let scored = matrix.score_all(None, &[]);
        let tied: Vec<&str> = scored
            .iter()
            .filter(|p| p.final_score == 65.0)
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(tied, vec!["monolith", "microservices", "cqrs"]);
    }

    #[test]
    fn top_n_excludes_non_viable_patterns() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        let top = matrix.top_n(3, None, &critical_budget());

        let names: Vec<&str> = top.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["monolith", "modular_monolith", "serverless"]);
        assert!(top.iter().all(|p| p.viable));
    }

    #[test]
    fn top_n_is_never_padded() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb).with_threshold(70.0);
        let top = matrix.top_n(3, None, &[]);

        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|p| p.final_score >= 70.0));
    }

    #[test]
    fn profile_changes_ranking() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        let scale = Priorities::Profile(DecisionProfile::ScaleFirst);
        let top = matrix.top_n(1, Some(&scale), &[]);

        assert_eq!(top[0].name, "microservices");
    }

    #[test]
    fn decisions_carry_cons_and_alternatives() {
        let kb = StaticKnowledgeBase::new();
        let matrix = DecisionMatrix::new(&kb);
        let top = matrix.top_n(3, None, &critical_budget());
        let decisions = matrix.to_architectural_decisions(&top);

        assert_eq!(decisions.len(), 3);
        assert_eq!(decisions[0].pattern, "monolith");
        assert!(decisions[0].trade_offs.contains(&"Single point of failure".to_string()));
        assert_eq!(
            decisions[0].alternatives_considered,
            vec!["modular_monolith".to_string(), "serverless".to_string()]
        );
        assert_eq!(decisions[1].score, 60.5);
    }
}
