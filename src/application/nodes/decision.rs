//! Decision node - deterministic pattern recommendation.

use tracing::{info, warn};

use super::{reply, NodeContext};
use crate::domain::conversation::ConversationNode;
use crate::domain::decision::{DecisionMatrix, ScoredPattern, VIABILITY_THRESHOLD};
use crate::domain::knowledge::PatternComparison;
use crate::domain::session::Session;

pub fn run(ctx: NodeContext<'_>, session: &mut Session) -> Option<String> {
    info!(session_id = %session.id(), "running decision node");
    session.enter(ConversationNode::Decision);

    let matrix = DecisionMatrix::new(ctx.catalog);
    let mut recommended = matrix.top_n(ctx.config.top_n, session.priorities(), session.constraints());
    let below_threshold = recommended.is_empty();
    if below_threshold {
        warn!(session_id = %session.id(), "no viable pattern, recording the best-scoring one");
        recommended = matrix
            .score_all(session.priorities(), session.constraints())
            .into_iter()
            .take(1)
            .collect();
    }

    let decisions = matrix.to_architectural_decisions(&recommended);
    info!(
        session_id = %session.id(),
        recommended = ?decisions.iter().map(|d| d.pattern.as_str()).collect::<Vec<_>>(),
        "decision recorded"
    );
    session.record_decisions(decisions);

    let names: Vec<&str> = recommended.iter().map(|p| p.name.as_str()).collect();
    let comparison = ctx.catalog.compare_patterns(&names);
    let text = recommendation_reply(&recommended, below_threshold, &comparison);
    reply(session, text)
}

fn recommendation_reply(
    recommended: &[ScoredPattern],
    below_threshold: bool,
    comparison: &PatternComparison,
) -> String {
    let mut parts = vec!["## Recommended architectures".to_string()];
    if below_threshold {
        parts.push(format!(
            "No pattern reached the viability threshold of {VIABILITY_THRESHOLD:.0}/100 under your \
             constraints. The best-scoring option is shown below; treat it with caution."
        ));
    }
    for (rank, pattern) in recommended.iter().enumerate() {
        parts.push(format!("### {}. {}\n{}", rank + 1, pattern.display_name, pattern.reasoning));
    }
    if recommended.len() > 1 {
        parts.push(format!("### Side by side\n{}", comparison.to_markdown()));
    }
    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::nodes::test_support::ScriptedGenerator;
    use crate::config::AgentConfig;
    use crate::domain::foundation::{Priority, SessionId};
    use crate::domain::knowledge::{Criterion, PatternCatalog, PatternProfile, StaticKnowledgeBase};
    use crate::domain::session::{Constraint, ConstraintType};

    #[test]
    fn records_top_three_for_balanced_session() {
        let generator = ScriptedGenerator::failing();
        let config = AgentConfig::default();
        let kb = StaticKnowledgeBase::new();
        let ctx = NodeContext { generator: &generator, catalog: &kb, config: &config };
        let mut session = Session::new(SessionId::new());

        let text = run(ctx, &mut session).unwrap();

        let patterns: Vec<&str> = session.decisions().iter().map(|d| d.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["serverless", "event_driven", "modular_monolith"]);
        assert!(text.contains("### 1. Serverless"));
        assert!(text.contains("| Aspect | Serverless | Event-Driven Architecture | Modular Monolith |"));
        assert!(!text.contains("viability threshold"));
        assert!(!session.is_waiting_for_user());
    }

    #[test]
    fn respects_configured_top_n() {
        let generator = ScriptedGenerator::failing();
        let config = AgentConfig {
            top_n: 1,
            ..Default::default()
        };
        let kb = StaticKnowledgeBase::new();
        let ctx = NodeContext { generator: &generator, catalog: &kb, config: &config };
        let mut session = Session::new(SessionId::new());

        let text = run(ctx, &mut session).unwrap();

        assert_eq!(session.decisions().len(), 1);
        assert!(!text.contains("Side by side"));
    }

    struct WeakCatalog;

    static WEAK: PatternProfile = PatternProfile {
        key: "weak",
        name: "Weak Pattern",
        description: "Scores poorly everywhere.",
        best_for: &[],
        pros: &[],
        cons: &["Rarely fits"],
        scoring: &[
            (Criterion::TimeToMarket, 20.0),
            (Criterion::Cost, 20.0),
            (Criterion::Scale, 20.0),
            (Criterion::Reliability, 20.0),
            (Criterion::Security, 20.0),
        ],
        tech_recommendations: &[],
    };

    impl PatternCatalog for WeakCatalog {
        fn lookup_pattern(&self, name: &str) -> Option<&PatternProfile> {
            (name == WEAK.key).then_some(&WEAK)
        }

        fn all_pattern_names(&self) -> Vec<&str> {
            vec![WEAK.key]
        }
    }

    #[test]
    fn flags_best_pattern_when_nothing_is_viable() {
        let generator = ScriptedGenerator::failing();
        let config = AgentConfig::default();
        let ctx = NodeContext { generator: &generator, catalog: &WeakCatalog, config: &config };
        let mut session = Session::new(SessionId::new());
        session.add_constraints([Constraint::new(ConstraintType::Budget, "Tiny budget", Priority::Critical)]);

        let text = run(ctx, &mut session).unwrap();

        assert_eq!(session.decisions().len(), 1);
        assert_eq!(session.decisions()[0].pattern, "weak");
        assert_eq!(session.decisions()[0].trade_offs, vec!["Rarely fits".to_string()]);
        assert!(text.contains("viability threshold of 40/100"));
    }
}
