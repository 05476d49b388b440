//! Deep-dive node - follow-up questions while confidence is low.

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::{reply, NodeContext};
use crate::application::prompts::{deep_dive_prompt, SYSTEM_PROMPT};
use crate::domain::conversation::ConversationNode;
use crate::domain::session::{Constraint, MessageRole, Requirement, Session};
use crate::ports::{generate_as, OutputSchema, StructuredResponse};

/// Messages scanned for the user's latest answers.
pub const ANSWER_WINDOW: usize = 6;

/// Confidence gained by a pass that has enough information.
pub const CONFIDENCE_STEP: f64 = 0.15;

/// Ceiling for confidence gained through deep dives.
pub const CONFIDENCE_CAP: f64 = 0.9;

pub const MAX_OPEN_QUESTIONS: usize = 3;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeepDiveResponse {
    #[serde(default)]
    pub new_requirements: Vec<Requirement>,
    #[serde(default)]
    pub new_constraints: Vec<Constraint>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(default)]
    pub ready_to_proceed: bool,
    #[serde(default)]
    pub summary: String,
}

impl DeepDiveResponse {
    fn fallback() -> Self {
        Self {
            ready_to_proceed: true,
            summary: "Continuing with the existing information.".to_string(),
            ..Default::default()
        }
    }
}

impl StructuredResponse for DeepDiveResponse {
    fn schema() -> OutputSchema {
        OutputSchema::new(
            "DeepDiveResponse",
            json!({
                "type": "object",
                "properties": {
                    "new_requirements": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "category": {"type": "string"},
                                "description": {"type": "string"},
                                "priority": {"enum": ["low", "medium", "high", "critical"]}
                            },
                            "required": ["description"]
                        }
                    },
                    "new_constraints": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": {"enum": ["budget", "timeline", "team", "compliance", "technical"]},
                                "description": {"type": "string"},
                                "severity": {"enum": ["low", "medium", "high", "critical"]}
                            },
                            "required": ["type", "description"]
                        }
                    },
                    "follow_up_questions": {"type": "array", "items": {"type": "string"}},
                    "ready_to_proceed": {"type": "boolean"},
                    "summary": {"type": "string"}
                },
                "required": ["follow_up_questions", "ready_to_proceed"]
            }),
        )
    }
}

pub async fn run(ctx: NodeContext<'_>, session: &mut Session) -> Option<String> {
    info!(session_id = %session.id(), "running deep dive node");
    session.enter(ConversationNode::DeepDive);

    let answers = recent_answers(session);
    let prompt = deep_dive_prompt(&answers, session);
    let response = match generate_as::<DeepDiveResponse>(ctx.generator, &prompt, Some(SYSTEM_PROMPT)).await {
        Ok(response) => response,
        Err(e) => {
            warn!(session_id = %session.id(), error = %e, "deep dive analysis failed, continuing with existing information");
            DeepDiveResponse::fallback()
        }
    };

    let requirements: Vec<Requirement> = response
        .new_requirements
        .iter()
        .filter(|r| !r.description.trim().is_empty())
        .cloned()
        .collect();
    let added_requirements = session.add_requirements(requirements);
    let added_constraints = session.add_constraints(response.new_constraints.iter().cloned());
    if added_requirements + added_constraints > 0 {
        info!(
            session_id = %session.id(),
            requirements = added_requirements,
            constraints = added_constraints,
            "deep dive added information"
        );
    }

    let questions: Vec<String> = response
        .follow_up_questions
        .iter()
        .filter(|q| !q.trim().is_empty())
        .take(MAX_OPEN_QUESTIONS)
        .cloned()
        .collect();
    session.set_open_questions(questions.clone());

    let text = if response.ready_to_proceed || questions.is_empty() {
        session.bump_confidence(CONFIDENCE_STEP, CONFIDENCE_CAP);
        session.set_waiting(false);
        proceed_reply(&response.summary)
    } else {
        session.set_waiting(true);
        questions_reply(&response, &questions, added_requirements, added_constraints)
    };
    reply(session, text)
}

/// User messages among the last few, oldest first.
fn recent_answers(session: &Session) -> String {
    session
        .recent_messages(ANSWER_WINDOW)
        .iter()
        .filter(|m| m.role == MessageRole::User)
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n---\n")
}

fn proceed_reply(summary: &str) -> String {
    let mut parts = vec!["## I have enough information".to_string()];
    if !summary.trim().is_empty() {
        parts.push(summary.trim().to_string());
    }
    parts.push("Moving on to the architecture analysis.".to_string());
    parts.join("\n\n")
}

fn questions_reply(
    response: &DeepDiveResponse,
    questions: &[String],
    added_requirements: usize,
    added_constraints: usize,
) -> String {
    let mut parts = vec!["## A few more details would help".to_string(), String::new()];
    if !response.summary.trim().is_empty() {
        parts.push(response.summary.trim().to_string());
        parts.push(String::new());
    }
    if added_requirements + added_constraints > 0 {
        parts.push("**Updated my understanding:**".to_string());
        if added_requirements > 0 {
            parts.push(format!("  • {added_requirements} new requirement(s)"));
        }
        if added_constraints > 0 {
            parts.push(format!("  • {added_constraints} new constraint(s)"));
        }
        parts.push(String::new());
    }
    parts.push("**Questions:**".to_string());
    parts.extend(questions.iter().enumerate().map(|(i, q)| format!("{}. {}", i + 1, q)));
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::nodes::test_support::ScriptedGenerator;
    use crate::config::AgentConfig;
    use crate::domain::foundation::SessionId;
    use crate::domain::knowledge::StaticKnowledgeBase;

    fn session_at(confidence: f64) -> Session {
        let mut session = Session::new(SessionId::new());
        session.raise_confidence(confidence);
        session.add_message(MessageRole::User, "We expect heavy seasonal traffic");
        session
    }

    #[tokio::test]
    async fn questions_keep_the_session_waiting() {
        let generator = ScriptedGenerator::new(vec![json!({
            "new_requirements": [{"category": "scale", "description": "Handle seasonal peaks"}],
            "follow_up_questions": ["Q1", "Q2", "Q3", "Q4"],
            "ready_to_proceed": false,
            "summary": ""
        })]);
        let config = AgentConfig::default();
        let kb = StaticKnowledgeBase::new();
        let ctx = NodeContext { generator: &generator, catalog: &kb, config: &config };
        let mut session = session_at(0.4);

        let text = run(ctx, &mut session).await.unwrap();

        assert!(session.is_waiting_for_user());
        assert_eq!(session.open_questions(), ["Q1", "Q2", "Q3"]);
        assert_eq!(session.requirements().len(), 1);
        assert_eq!(session.confidence(), 0.4);
        assert!(text.contains("3. Q3"));
        assert!(!text.contains("Q4"));
    }

    #[tokio::test]
    async fn ready_pass_adds_exactly_one_step() {
        let generator = ScriptedGenerator::new(vec![json!({
            "follow_up_questions": ["Anything else?"],
            "ready_to_proceed": true
        })]);
        let config = AgentConfig::default();
        let kb = StaticKnowledgeBase::new();
        let ctx = NodeContext { generator: &generator, catalog: &kb, config: &config };
        let mut session = session_at(0.5);

        run(ctx, &mut session).await;

        assert!((session.confidence() - 0.65).abs() < 1e-9);
        assert!(!session.is_waiting_for_user());
    }

    #[tokio::test]
    async fn confidence_is_capped() {
        let generator = ScriptedGenerator::failing();
        let config = AgentConfig::default();
        let kb = StaticKnowledgeBase::new();
        let ctx = NodeContext { generator: &generator, catalog: &kb, config: &config };
        let mut session = session_at(0.85);

        run(ctx, &mut session).await;

        assert_eq!(session.confidence(), CONFIDENCE_CAP);
    }

    #[tokio::test]
    async fn failure_falls_back_to_proceeding() {
        let generator = ScriptedGenerator::failing();
        let config = AgentConfig::default();
        let kb = StaticKnowledgeBase::new();
        let ctx = NodeContext { generator: &generator, catalog: &kb, config: &config };
        let mut session = session_at(0.0);

        let text = run(ctx, &mut session).await.unwrap();

        assert!(text.contains("Continuing with the existing information."));
        assert!((session.confidence() - CONFIDENCE_STEP).abs() < 1e-9);
        assert!(session.open_questions().is_empty());
    }

    #[test]
    fn answers_only_include_recent_user_messages() {
        let mut session = Session::new(SessionId::new());
        for i in 0..4 {
            session.add_message(MessageRole::User, format!("answer {i}"));
            session.add_message(MessageRole::Assistant, format!("question {i}"));
        }

        let answers = recent_answers(&session);

        assert_eq!(answers, "answer 1\n---\nanswer 2\n---\nanswer 3");
    }
}
