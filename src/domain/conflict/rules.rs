//! Deterministic conflict rules.

use super::Conflict;
use crate::domain::session::{Constraint, ConstraintType, Requirement};

/// A named rule that fires on a combination of requirements and constraints.
pub struct ConflictRule {
    pub name: &'static str,
    /// Requirement keywords (lower-case); any match triggers the requirement side.
    pub requirement_keywords: &'static [&'static str],
    /// Constraint type that must be present with high or critical severity.
    pub pressing_constraint: ConstraintType,
    pub explanation: &'static str,
    pub compromises: &'static [&'static str],
}

impl ConflictRule {
    /// Requirements that satisfy the keyword side of the rule.
    fn matching_requirements<'r>(&self, requirements: &'r [Requirement]) -> Vec<&'r Requirement> {
        requirements
            .iter()
            .filter(|r| r.mentions_any(self.requirement_keywords))
            .collect()
    }

    fn constraint_applies(&self, constraints: &[Constraint]) -> bool {
        constraints
            .iter()
            .any(|c| c.is_pressing(self.pressing_constraint))
    }
}

/// Rules in evaluation order.
pub static CONFLICT_RULES: &[ConflictRule] = &[
    ConflictRule {
        name: "scale_vs_cost",
        requirement_keywords: &["scale", "million"],
        pressing_constraint: ConstraintType::Budget,
        explanation: "High scale requirements clash with the budget constraint",
        compromises: &[
            "Start with a simple architecture and plan a future migration path",
            "Choose a managed platform that allows gradual scaling",
            "Define growth stages with a budget for each stage",
        ],
    },
    ConflictRule {
        name: "speed_vs_security",
        requirement_keywords: &["compliance", "security", "gdpr", "pci"],
        pressing_constraint: ConstraintType::Timeline,
        explanation: "Security and compliance requirements clash with a tight timeline",
        compromises: &[
            "Launch an MVP with baseline security and add layers incrementally",
            "Use managed services with built-in compliance",
            "Reduce scope to the essential features only",
        ],
    },
    ConflictRule {
        name: "reliability_vs_cost",
        requirement_keywords: &["uptime", "99.9", "availability"],
        pressing_constraint: ConstraintType::Budget,
        explanation: "High availability requirements demand significant investment",
        compromises: &[
            "Start with a lower SLA and upgrade gradually",
            "Use managed services instead of self-hosting",
            "Define different SLA tiers for different components",
        ],
    },
];

/// Evaluates every rule in order and returns the ones that fire.
pub fn detect_conflicts(requirements: &[Requirement], constraints: &[Constraint]) -> Vec<Conflict> {
    CONFLICT_RULES
        .iter()
        .filter_map(|rule| {
            let matched = rule.matching_requirements(requirements);
            if matched.is_empty() || !rule.constraint_applies(constraints) {
                return None;
            }
            Some(Conflict::new(
                matched.iter().map(|r| r.description.clone()).collect(),
                rule.explanation,
                rule.compromises.iter().map(|c| c.to_string()).collect(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Priority;

    fn req(description: &str) -> Requirement {
        Requirement::new("general", description, Priority::High).unwrap()
    }

    #[test]
    fn scale_vs_cost_fires_on_million_users_and_critical_budget() {
        let reqs = vec![req("Support 2 million users")];
        let constraints = vec![Constraint::new(ConstraintType::Budget, "Tight", Priority::Critical)];

        let conflicts = detect_conflicts(&reqs, &constraints);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].explanation, CONFLICT_RULES[0].explanation);
        assert_eq!(conflicts[0].compromises.len(), 3);
        assert_eq!(conflicts[0].requirements, vec!["Support 2 million users".to_string()]);
    }

    #[test]
    fn medium_budget_does_not_fire() {
        let reqs = vec![req("Needs to scale globally")];
        let constraints = vec![Constraint::new(ConstraintType::Budget, "Some", Priority::Medium)];

        assert!(detect_conflicts(&reqs, &constraints).is_empty());
    }

    #[test]
    fn speed_vs_security_needs_pressing_timeline() {
        let reqs = vec![req("GDPR compliant storage")];
        let high = vec![Constraint::new(ConstraintType::Timeline, "3 weeks", Priority::High)];
        let low = vec![Constraint::new(ConstraintType::Timeline, "Whenever", Priority::Low)];

        assert_eq!(detect_conflicts(&reqs, &high).len(), 1);
        assert!(detect_conflicts(&reqs, &low).is_empty());
    }

    #[test]
    fn rules_fire_in_declared_order() {
        let reqs = vec![req("99.9% uptime"), req("Scale to a million users"), req("PCI payments")];
        let constraints = vec![
            Constraint::new(ConstraintType::Budget, "Bootstrapped", Priority::High),
            Constraint::new(ConstraintType::Timeline, "Demo day", Priority::Critical),
        ];

        let conflicts = detect_conflicts(&reqs, &constraints);
        let names: Vec<&str> = conflicts
            .iter()
            .map(|c| c.explanation.as_str())
            .collect();

        assert_eq!(
            names,
            CONFLICT_RULES.iter().map(|r| r.explanation).collect::<Vec<_>>()
        );
    }

    #[test]
    fn no_requirements_means_no_conflicts() {
        let constraints = vec![Constraint::new(ConstraintType::Budget, "Tight", Priority::Critical)];
        assert!(detect_conflicts(&[], &constraints).is_empty());
    }
}
