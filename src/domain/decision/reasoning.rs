//! Human-readable explanation of a pattern score.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::matrix::{ConstraintAdjustment, CriterionContribution};

/// Adjustments smaller than this (in absolute value) are left out of the reasoning.
pub const NOTABLE_ADJUSTMENT: f64 = 10.0;

/// Qualitative band for a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Acceptable,
    NotRecommended,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else if score >= 40.0 {
            ScoreBand::Acceptable
        } else {
            ScoreBand::NotRecommended
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent fit",
            ScoreBand::Good => "Good fit",
            ScoreBand::Acceptable => "Acceptable",
            ScoreBand::NotRecommended => "Not recommended",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Builds the reasoning text for a scored pattern.
///
/// Strongest and weakest criteria are taken by weighted contribution; ties
/// keep canonical criterion order.
pub fn compose_reasoning(
    display_name: &str,
    final_score: f64,
    breakdown: &[CriterionContribution],
    adjustments: &[ConstraintAdjustment],
) -> String {
    let band = ScoreBand::from_score(final_score);
    let mut lines = vec![format!("**{}** ({} - {:.0}/100)", display_name, band, final_score)];

    let mut ranked: Vec<&CriterionContribution> = breakdown.iter().collect();
    ranked.sort_by(|a, b| {
        b.weighted
            .partial_cmp(&a.weighted)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if let (Some(strongest), Some(weakest)) = (ranked.first(), ranked.last()) {
        lines.push(format!(
            "Strongest: {} ({:.1} pts)",
            strongest.criterion.label(),
            strongest.weighted
        ));
        lines.push(format!(
            "Weakest: {} ({:.1} pts)",
            weakest.criterion.label(),
            weakest.weighted
        ));
    }

    let notable: Vec<&ConstraintAdjustment> = adjustments
        .iter()
        .filter(|a| a.delta.abs() >= NOTABLE_ADJUSTMENT)
        .collect();
    if !notable.is_empty() {
        lines.push("Constraint impact:".to_string());
        for adj in notable {
            lines.push(format!("  • {}: {:+.0}", adj.constraint_type, adj.delta));
        }
    }

    lines.join("\n")
}
