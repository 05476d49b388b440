//! Conflict node - detects tensions between requirements and reports them.

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::{reply, NodeContext};
use crate::application::prompts::{conflict_prompt, SYSTEM_PROMPT};
use crate::domain::conflict::{apply_resolution, detect_conflicts, merge_conflicts, Conflict, ResolutionOutcome};
use crate::domain::conversation::ConversationNode;
use crate::domain::session::Session;
use crate::ports::{generate_as, OutputSchema, StructuredResponse};

/// Involved requirements shown per conflict in the report.
const MAX_LISTED_REQUIREMENTS: usize = 3;

/// Model-detected conflicts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConflictAnalysis {
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
}

impl StructuredResponse for ConflictAnalysis {
    fn schema() -> OutputSchema {
        OutputSchema::new(
            "ConflictAnalysis",
            json!({
                "type": "object",
                "properties": {
                    "conflicts": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "requirements": {"type": "array", "items": {"type": "string"}},
                                "explanation": {"type": "string"},
                                "compromises": {"type": "array", "items": {"type": "string"}}
                            },
                            "required": ["explanation", "compromises"]
                        }
                    }
                },
                "required": ["conflicts"]
            }),
        )
    }
}

pub async fn run(ctx: NodeContext<'_>, session: &mut Session) -> Option<String> {
    info!(session_id = %session.id(), "running conflict node");
    session.enter(ConversationNode::Conflict);

    let rule_based = detect_conflicts(session.requirements(), session.constraints());
    let model = detect_with_model(ctx, session).await;
    let added = session.absorb_conflicts(merge_conflicts(rule_based, model));

    if added > 0 {
        info!(session_id = %session.id(), added, "new conflicts detected");
        session.set_waiting(true);
        let text = conflict_report(session);
        return reply(session, text);
    }

    if session.conflicts().is_empty() {
        info!(session_id = %session.id(), "no conflicts detected");
        return reply(
            session,
            "No significant conflicts between your requirements. Moving on.".to_string(),
        );
    }
    None
}

/// Applies a `conflict-compromise` answer, or a deferral, to the session.
pub fn process_response(session: &mut Session, message: &str) -> String {
    match apply_resolution(session.conflicts_mut(), message) {
        ResolutionOutcome::Deferred => "Leaving the conflicts open for now.".to_string(),
        ResolutionOutcome::Applied(applied) if applied.is_empty() => {
            "I couldn't match that to a conflict and compromise, so the conflicts stay open.".to_string()
        }
        ResolutionOutcome::Applied(applied) => applied
            .iter()
            .map(|a| format!("Conflict #{} resolved: {}", a.conflict_index + 1, a.compromise))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

async fn detect_with_model(ctx: NodeContext<'_>, session: &Session) -> Vec<Conflict> {
    let prompt = conflict_prompt(session);
    match generate_as::<ConflictAnalysis>(ctx.generator, &prompt, Some(SYSTEM_PROMPT)).await {
        Ok(analysis) => analysis
            .conflicts
            .into_iter()
            .filter(|c| !c.explanation.trim().is_empty())
            .map(|c| Conflict::new(c.requirements, c.explanation, c.compromises))
            .collect(),
        Err(e) => {
            warn!(session_id = %session.id(), error = %e, "model conflict detection failed, using rules only");
            Vec::new()
        }
    }
}

/// Numbered report of every open conflict. Numbers are session positions,
/// so they stay valid as resolution targets.
fn conflict_report(session: &Session) -> String {
    let mut parts = vec!["## Conflicts between your requirements".to_string()];

    for (index, conflict) in session.open_conflicts() {
        parts.push(String::new());
        parts.push(format!("**Conflict #{}:** {}", index + 1, conflict.explanation));
        if !conflict.requirements.is_empty() {
            parts.push("Involved requirements:".to_string());
            parts.extend(
                conflict
                    .requirements
                    .iter()
                    .take(MAX_LISTED_REQUIREMENTS)
                    .map(|r| format!("  • {r}")),
            );
        }
        parts.push("Possible compromises:".to_string());
        parts.extend(
            conflict
                .compromises
                .iter()
                .enumerate()
                .map(|(j, c)| format!("  {}. {}", j + 1, c)),
        );
    }

    parts.push(String::new());
    parts.push("---".to_string());
    parts.push(
        "Which compromise do you prefer? Reply with conflict and compromise numbers, \
         e.g. `1-2` for conflict 1, compromise 2. Or reply `skip` to continue without resolving."
            .to_string(),
    );
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::nodes::test_support::ScriptedGenerator;
    use crate::config::AgentConfig;
    use crate::domain::foundation::{Priority, SessionId};
    use crate::domain::knowledge::StaticKnowledgeBase;
    use crate::domain::session::{Constraint, ConstraintType, Requirement};

    fn scale_vs_budget_session() -> Session {
        let mut session = Session::new(SessionId::new());
        session.add_requirements([Requirement::new("scale", "Support 2 million users", Priority::High).unwrap()]);
        session.add_constraints([Constraint::new(ConstraintType::Budget, "Tiny budget", Priority::Critical)]);
        session
    }

    #[tokio::test]
    async fn rule_conflicts_are_reported_and_wait_for_user() {
        let generator = ScriptedGenerator::failing();
        let config = AgentConfig::default();
        let kb = StaticKnowledgeBase::new();
        let ctx = NodeContext { generator: &generator, catalog: &kb, config: &config };
        let mut session = scale_vs_budget_session();

        let text = run(ctx, &mut session).await.unwrap();

        assert!(session.is_waiting_for_user());
        assert_eq!(session.conflicts().len(), 1);
        assert!(text.contains("**Conflict #1:** High scale requirements clash with the budget constraint"));
        assert!(text.contains("  • Support 2 million users"));
    }

    #[tokio::test]
    async fn model_conflicts_are_merged_after_rules() {
        let generator = ScriptedGenerator::new(vec![json!({
            "conflicts": [
                {"explanation": "HIGH SCALE REQUIREMENTS CLASH WITH THE BUDGET CONSTRAINT", "compromises": ["x"]},
                {"requirements": ["Offline mode"], "explanation": "Offline mode conflicts with real-time sync", "compromises": ["Queue writes", "Drop offline"]}
            ]
        })]);
        let config = AgentConfig::default();
        let kb = StaticKnowledgeBase::new();
        let ctx = NodeContext { generator: &generator, catalog: &kb, config: &config };
        let mut session = scale_vs_budget_session();

        run(ctx, &mut session).await;

        assert_eq!(session.conflicts().len(), 2);
        assert_eq!(session.conflicts()[1].explanation, "Offline mode conflicts with real-time sync");
    }

    #[tokio::test]
    async fn rerun_without_new_conflicts_does_not_wait() {
        let config = AgentConfig::default();
        let kb = StaticKnowledgeBase::new();
        let mut session = scale_vs_budget_session();

        let generator = ScriptedGenerator::failing();
        let ctx = NodeContext { generator: &generator, catalog: &kb, config: &config };
        run(ctx, &mut session).await;
        session.set_waiting(false);

        let reply = run(ctx, &mut session).await;

        assert!(reply.is_none());
        assert!(!session.is_waiting_for_user());
        assert_eq!(session.conflicts().len(), 1);
    }

    #[tokio::test]
    async fn no_conflicts_moves_on() {
        let generator = ScriptedGenerator::new(vec![json!({"conflicts": []})]);
        let config = AgentConfig::default();
        let kb = StaticKnowledgeBase::new();
        let ctx = NodeContext { generator: &generator, catalog: &kb, config: &config };
        let mut session = Session::new(SessionId::new());

        let text = run(ctx, &mut session).await.unwrap();

        assert!(!session.is_waiting_for_user());
        assert!(text.starts_with("No significant conflicts"));
    }

    #[test]
    fn resolution_reply_names_the_chosen_compromise() {
        let mut session = scale_vs_budget_session();
        session.absorb_conflicts(detect_conflicts(session.requirements(), session.constraints()));
        let chosen = session.conflicts()[0].compromises[1].clone();

        let text = process_response(&mut session, "1-2");

        assert_eq!(text, format!("Conflict #1 resolved: {chosen}"));
        assert!(session.conflicts()[0].resolved);
    }

    #[test]
    fn out_of_range_and_skip_leave_conflicts_open() {
        let mut session = scale_vs_budget_session();
        session.absorb_conflicts(detect_conflicts(session.requirements(), session.constraints()));

        assert!(process_response(&mut session, "3-1").contains("stay open"));
        assert!(process_response(&mut session, "Skip").contains("open for now"));
        assert!(session.conflicts()[0].is_open());
    }
}
