//! Prompt templates for the generation collaborator.
//!
//! Every template is a plain function of session data so the wording can be
//! tested without a provider.

use crate::domain::decision::ArchitecturalDecision;
use crate::domain::session::{Message, Session};

/// System prompt shared by every generation call.
pub const SYSTEM_PROMPT: &str = "You are a senior software architect helping a user choose an \
architecture for their project. Be concrete and concise. Base every statement on what the \
user has told you; do not invent requirements they did not state.";

const NONE: &str = "none";

pub fn intake_prompt(description: &str, history: &[Message]) -> String {
    format!(
        "Analyze the project description below.\n\n\
         Extract:\n\
         - project_name: a short name if one is given or obvious\n\
         - requirements: functional and non-functional needs (category, description, priority)\n\
         - constraints: limits of type budget, timeline, team, compliance or technical, with severity\n\
         - summary: two or three sentences restating the project\n\
         - confidence: 0.0-1.0, how well the description supports an architecture decision\n\n\
         Priorities and severities are one of: low, medium, high, critical.\n\n\
         ## Conversation so far\n{}\n\n\
         ## Latest description\n{}",
        render_history(history),
        description
    )
}

pub fn conflict_prompt(session: &Session) -> String {
    format!(
        "Look for requirements that pull the architecture in opposite directions, given the \
         constraints and priorities. Only report real tensions. For each one give the involved \
         requirement descriptions, a one-sentence explanation and two or three compromises.\n\n\
         ## Requirements\n{}\n\n\
         ## Constraints\n{}\n\n\
         ## Priorities\n{}",
        render_requirements(session),
        render_constraints(session),
        render_priorities(session)
    )
}

pub fn deep_dive_prompt(answers: &str, session: &Session) -> String {
    let questions = if session.open_questions().is_empty() {
        NONE.to_string()
    } else {
        session
            .open_questions()
            .iter()
            .map(|q| format!("- {q}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "The user answered follow-up questions about their project. Extract any new \
         requirements and constraints from the answers, list up to three follow-up questions \
         that would most change the architecture decision, and set ready_to_proceed when the \
         information is sufficient.\n\n\
         ## Recent answers\n{}\n\n\
         ## Current context\n\
         Project: {}\n\
         Requirements: {}\n\
         Constraints: {}\n\
         Priorities: {}\n\
         Confidence: {:.2}\n\n\
         ## Open questions\n{}",
        if answers.is_empty() { "no new answers" } else { answers },
        session.project_name().unwrap_or("unnamed"),
        session.requirements().len(),
        session.constraints().len(),
        render_priorities(session),
        session.confidence(),
        questions
    )
}

/// `pattern_summary` is the catalog's summary of the chosen pattern, when known.
pub fn blueprint_prompt(
    decision: &ArchitecturalDecision,
    pattern_summary: Option<&str>,
    session: &Session,
) -> String {
    let resolutions: Vec<String> = session
        .conflicts()
        .iter()
        .filter_map(|c| c.chosen_compromise.as_ref().map(|choice| format!("- {}: {}", c.explanation, choice)))
        .collect();

    format!(
        "Write an implementation blueprint for a {} architecture.\n\n\
         Include an overview paragraph, the main components with their responsibility, a tech \
         stack per layer, key risks and concrete next steps.\n\n\
         ## Pattern\n{}\n\n\
         ## Why this pattern\n{}\n\n\
         ## Trade-offs to address\n{}\n\n\
         ## Requirements\n{}\n\n\
         ## Constraints\n{}\n\n\
         ## Agreed compromises\n{}",
        decision.display_name,
        pattern_summary.unwrap_or(NONE),
        decision.justification,
        bullet_list(&decision.trade_offs),
        render_requirements(session),
        render_constraints(session),
        if resolutions.is_empty() { NONE.to_string() } else { resolutions.join("\n") }
    )
}

fn render_history(history: &[Message]) -> String {
    if history.is_empty() {
        return NONE.to_string();
    }
    history
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_requirements(session: &Session) -> String {
    if session.requirements().is_empty() {
        return NONE.to_string();
    }
    session
        .requirements()
        .iter()
        .map(|r| format!("- [{}] {} (priority: {})", r.category, r.description, r.priority.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_constraints(session: &Session) -> String {
    if session.constraints().is_empty() {
        return NONE.to_string();
    }
    session
        .constraints()
        .iter()
        .map(|c| format!("- [{}] {} (severity: {})", c.constraint_type, c.description, c.severity.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_priorities(session: &Session) -> String {
    session
        .priorities()
        .map(|p| p.describe())
        .unwrap_or_else(|| "balanced (not set)".to_string())
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return NONE.to_string();
    }
    items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Priority, SessionId};
    use crate::domain::conflict::{apply_resolution, Conflict};
    use crate::domain::session::{Constraint, ConstraintType, Requirement};

    fn session() -> Session {
        let mut session = Session::new(SessionId::new());
        session.add_requirements([Requirement::new("scale", "Support 2 million users", Priority::High).unwrap()]);
        session.add_constraints([Constraint::new(ConstraintType::Budget, "Tight budget", Priority::Critical)]);
        session
    }

    #[test]
    fn conflict_prompt_lists_requirements_and_constraints() {
        let prompt = conflict_prompt(&session());
        assert!(prompt.contains("- [scale] Support 2 million users (priority: high)"));
        assert!(prompt.contains("- [budget] Tight budget (severity: critical)"));
        assert!(prompt.contains("balanced (not set)"));
    }

    #[test]
    fn empty_sections_render_as_none() {
        let prompt = conflict_prompt(&Session::new(SessionId::new()));
        assert!(prompt.contains("## Requirements\nnone"));
    }

    #[test]
    fn blueprint_prompt_includes_pattern_summary_and_compromises() {
        let mut session = session();
        session.absorb_conflicts(vec![Conflict::new(
            vec![],
            "Scale clashes with budget",
            vec!["Use managed services".to_string(), "Phase the rollout".to_string()],
        )]);
        apply_resolution(session.conflicts_mut(), "1-2");
        let decision = ArchitecturalDecision {
            pattern: "serverless".to_string(),
            display_name: "Serverless".to_string(),
            justification: "Fits spiky traffic.".to_string(),
            trade_offs: vec!["Cold start latency".to_string()],
            alternatives_considered: vec![],
            score: 72.0,
        };

        let prompt = blueprint_prompt(&decision, Some("**Serverless**\nEvent-driven functions."), &session);

        assert!(prompt.contains("## Pattern\n**Serverless**\nEvent-driven functions."));
        assert!(prompt.contains("- Cold start latency"));
        assert!(prompt.contains("- Scale clashes with budget: Phase the rollout"));
        assert!(blueprint_prompt(&decision, None, &session).contains("## Pattern\nnone"));
    }

    #[test]
    fn intake_prompt_embeds_description() {
        let prompt = intake_prompt("A marketplace for used bikes", &[]);
        assert!(prompt.ends_with("A marketplace for used bikes"));
    }
}
