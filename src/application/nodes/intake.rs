//! Intake node - turns the first project description into structured data.

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::{reply, NodeContext};
use crate::application::prompts::{intake_prompt, SYSTEM_PROMPT};
use crate::domain::conversation::ConversationNode;
use crate::domain::session::{Constraint, Requirement, Session};
use crate::ports::{generate_as, OutputSchema, StructuredResponse};

/// Highest confidence the intake estimate may establish.
pub const INTAKE_CONFIDENCE_CAP: f64 = 0.9;

/// Structured analysis of a project description.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntakeAnalysis {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub confidence: f64,
}

impl StructuredResponse for IntakeAnalysis {
    fn schema() -> OutputSchema {
        OutputSchema::new(
            "IntakeAnalysis",
            json!({
                "type": "object",
                "properties": {
                    "project_name": {"type": ["string", "null"]},
                    "requirements": {
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
                    "constraints": {
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
                    "summary": {"type": "string"},
                    "confidence": {"type": "number", "minimum": 0, "maximum": 1}
                },
                "required": ["requirements", "constraints", "summary", "confidence"]
            }),
        )
    }
}

pub async fn run(ctx: NodeContext<'_>, session: &mut Session) -> Option<String> {
    info!(session_id = %session.id(), "running intake node");
    session.enter(ConversationNode::Intake);

    let description = session
        .messages()
        .last()
        .map(|m| m.content.clone())
        .unwrap_or_default();
    let history = session.recent_messages(ctx.config.history_limit + 1);
    let history = &history[..history.len().saturating_sub(1)];
    let prompt = intake_prompt(&description, history);

    let analysis = match generate_as::<IntakeAnalysis>(ctx.generator, &prompt, Some(SYSTEM_PROMPT)).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(session_id = %session.id(), error = %e, "intake analysis failed, continuing without extraction");
            return reply(session, fallback_reply());
        }
    };

    if let Some(name) = analysis.project_name.as_deref() {
        session.set_project_name_if_absent(name);
    }
    let requirements: Vec<Requirement> = analysis
        .requirements
        .into_iter()
        .filter(|r| !r.description.trim().is_empty())
        .collect();
    let added_requirements = session.add_requirements(requirements);
    let added_constraints = session.add_constraints(analysis.constraints);
    session.raise_confidence(analysis.confidence.min(INTAKE_CONFIDENCE_CAP));

    info!(
        session_id = %session.id(),
        requirements = added_requirements,
        constraints = added_constraints,
        confidence = session.confidence(),
        "intake complete"
    );

    let text = summary_reply(session, &analysis.summary);
    reply(session, text)
}

fn summary_reply(session: &Session, summary: &str) -> String {
    let mut parts = vec![format!(
        "## Project overview: {}",
        session.project_name().unwrap_or("your project")
    )];
    if !summary.trim().is_empty() {
        parts.push(summary.trim().to_string());
    }

    if !session.requirements().is_empty() {
        parts.push("**Requirements**".to_string());
        parts.extend(
            session
                .requirements()
                .iter()
                .map(|r| format!("  • {} ({})", r.description, r.priority.as_str())),
        );
    }
    if !session.constraints().is_empty() {
        parts.push("**Constraints**".to_string());
        parts.extend(
            session
                .constraints()
                .iter()
                .map(|c| format!("  • [{}] {} ({})", c.constraint_type, c.description, c.severity.as_str())),
        );
    }
    parts.join("\n")
}

fn fallback_reply() -> String {
    "Thanks, I have your project description. Let's look at what matters most to you.".to_string()
}
