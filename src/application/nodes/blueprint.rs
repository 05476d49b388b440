//! Blueprint node - the final deliverable for the top recommendation.

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::{reply, NodeContext};
use crate::application::prompts::{blueprint_prompt, SYSTEM_PROMPT};
use crate::domain::conversation::ConversationNode;
use crate::domain::decision::ArchitecturalDecision;
use crate::domain::knowledge::PatternCatalog;
use crate::domain::session::{Blueprint, BlueprintComponent, Session, TechStackEntry};
use crate::ports::{generate_as, OutputSchema, StructuredResponse};

/// Model-written blueprint body. Pattern identity comes from the decision.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlueprintDraft {
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub components: Vec<BlueprintComponent>,
    #[serde(default)]
    pub tech_stack: Vec<TechStackEntry>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

impl BlueprintDraft {
    fn into_blueprint(self, decision: &ArchitecturalDecision) -> Blueprint {
        Blueprint {
            pattern: decision.pattern.clone(),
            pattern_name: decision.display_name.clone(),
            overview: self.overview,
            components: self.components,
            tech_stack: self.tech_stack,
            risks: self.risks,
            next_steps: self.next_steps,
        }
    }
}

impl StructuredResponse for BlueprintDraft {
    fn schema() -> OutputSchema {
        OutputSchema::new(
            "BlueprintDraft",
            json!({
                "type": "object",
                "properties": {
                    "overview": {"type": "string"},
                    "components": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": {"type": "string"},
                                "responsibility": {"type": "string"}
                            },
                            "required": ["name"]
                        }
                    },
                    "tech_stack": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "layer": {"type": "string"},
                                "options": {"type": "array", "items": {"type": "string"}}
                            },
                            "required": ["layer"]
                        }
                    },
                    "risks": {"type": "array", "items": {"type": "string"}},
                    "next_steps": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["overview", "components", "tech_stack"]
            }),
        )
    }
}

pub async fn run(ctx: NodeContext<'_>, session: &mut Session) -> Option<String> {
    info!(session_id = %session.id(), "running blueprint node");
    session.enter(ConversationNode::Blueprint);

    let Some(decision) = session.decisions().first().cloned() else {
        warn!(session_id = %session.id(), "blueprint requested without a recorded decision");
        return reply(
            session,
            "There is no recommendation to build a blueprint from yet.".to_string(),
        );
    };

    let summary = ctx.catalog.pattern_summary(&decision.pattern);
    let prompt = blueprint_prompt(&decision, summary.as_deref(), session);
    let blueprint = match generate_as::<BlueprintDraft>(ctx.generator, &prompt, Some(SYSTEM_PROMPT)).await {
        Ok(draft) => draft.into_blueprint(&decision),
        Err(e) => {
            warn!(session_id = %session.id(), error = %e, "blueprint generation failed, building from the knowledge base");
            knowledge_base_blueprint(ctx.catalog, &decision, session)
        }
    };

    info!(session_id = %session.id(), pattern = %blueprint.pattern, "blueprint ready");
    let text = blueprint.to_markdown();
    session.set_blueprint(blueprint);
    reply(session, text)
}

/// Deterministic blueprint from catalog metadata.
///
/// Pros become components, tech recommendations the stack and cons the
/// risks. Agreed compromises are carried into the next steps.
pub fn knowledge_base_blueprint(
    catalog: &dyn PatternCatalog,
    decision: &ArchitecturalDecision,
    session: &Session,
) -> Blueprint {
    let profile = catalog.lookup_pattern(&decision.pattern);

    let overview = match profile {
        Some(p) => format!("{} {}", p.description, summary_line(session)),
        None => summary_line(session),
    };
    let components = profile
        .map(|p| {
            p.pros
                .iter()
                .map(|pro| BlueprintComponent {
                    name: pro.to_string(),
                    responsibility: format!("Design principle of the {} approach", p.name),
                })
                .collect()
        })
        .unwrap_or_default();
    let tech_stack = profile
        .map(|p| {
            p.tech_recommendations
                .iter()
                .map(|t| TechStackEntry {
                    layer: t.layer.to_string(),
                    options: t.options.iter().map(|o| o.to_string()).collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    let mut next_steps: Vec<String> = session
        .conflicts()
        .iter()
        .filter_map(|c| c.chosen_compromise.as_ref())
        .map(|choice| format!("Apply the agreed compromise: {choice}"))
        .collect();
    next_steps.extend([
        "Review this blueprint with the team and confirm the pattern choice".to_string(),
        "Pick one option per tech stack layer and build a thin vertical slice".to_string(),
        "Set up CI/CD and monitoring before the first release".to_string(),
    ]);

    Blueprint {
        pattern: decision.pattern.clone(),
        pattern_name: decision.display_name.clone(),
        overview,
        components,
        tech_stack,
        risks: decision.trade_offs.clone(),
        next_steps,
    }
}

fn summary_line(session: &Session) -> String {
    format!(
        "Recommended for {} based on {} requirement(s) and {} constraint(s).",
        session.project_name().unwrap_or("this project"),
        session.requirements().len(),
        session.constraints().len()
    )
}
