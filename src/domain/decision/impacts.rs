//! Constraint impact table.
//!
//! Base penalty (or bonus) a constraint type applies to a pattern before
//! the severity multiplier. Missing rows and columns count as zero.

use crate::domain::knowledge::normalize_pattern_key;
use crate::domain::session::ConstraintType;

/// Unscaled impact of a constraint type on a pattern.
pub fn constraint_impact(constraint_type: ConstraintType, pattern: &str) -> f64 {
    let key = normalize_pattern_key(pattern);
    let row = match key.as_str() {
        "microservices" => [-30.0, -35.0, -25.0, -10.0],
        "cqrs" => [-25.0, -30.0, -30.0, 5.0],
        "event_driven" => [-20.0, -20.0, -20.0, -5.0],
        "serverless" => [-10.0, -5.0, -15.0, -20.0],
        "modular_monolith" => [-5.0, -10.0, -10.0, 0.0],
        _ => return 0.0,
    };
    match constraint_type {
        ConstraintType::Budget => row[0],
        ConstraintType::Timeline => row[1],
        ConstraintType::Team => row[2],
        ConstraintType::Compliance => row[3],
        ConstraintType::Technical | ConstraintType::Other => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn microservices_pays_heavily_for_timeline() {
        assert_eq!(constraint_impact(ConstraintType::Timeline, "microservices"), -35.0);
    }

    #[test]
    fn cqrs_gains_under_compliance() {
        assert_eq!(constraint_impact(ConstraintType::Compliance, "cqrs"), 5.0);
    }

    #[test]
    fn monolith_is_unaffected() {
        for t in [
            ConstraintType::Budget,
            ConstraintType::Timeline,
            ConstraintType::Team,
            ConstraintType::Compliance,
        ] {
            assert_eq!(constraint_impact(t, "monolith"), 0.0);
        }
    }

    #[test]
    fn technical_and_unknown_types_have_no_impact() {
        assert_eq!(constraint_impact(ConstraintType::Technical, "microservices"), 0.0);
        assert_eq!(constraint_impact(ConstraintType::Other, "serverless"), 0.0);
    }

    #[test]
    fn unknown_pattern_has_no_impact() {
        assert_eq!(constraint_impact(ConstraintType::Budget, "mainframe"), 0.0);
    }

    #[test]
    fn lookup_accepts_display_style_names() {
        assert_eq!(constraint_impact(ConstraintType::Budget, "Modular Monolith"), -5.0);
    }
}
