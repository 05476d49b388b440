//! Priority node - asks what matters most and parses the answer.
//!
//! Accepted answers, in order of precedence:
//! 1. a ranking such as `cost=5, scale=3` (unranked criteria default to 3)
//! 2. a profile number (1-4) or keyword such as `security`
//!
//! Anything else keeps balanced weights.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use super::reply;
use crate::domain::conversation::ConversationNode;
use crate::domain::decision::{DecisionProfile, Priorities, PriorityRanking};
use crate::domain::knowledge::Criterion;
use crate::domain::session::Session;

static RANKING_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(time[ _-]to[ _-]market|ttm|time|speed|cost|budget|scalability|scale|reliability|availability|security)\s*[=:]\s*(\d+)",
    )
    .expect("ranking pattern is valid")
});

pub fn run(session: &mut Session) -> Option<String> {
    info!(session_id = %session.id(), "running priority node");
    session.enter(ConversationNode::Priority);

    if let Some(priorities) = session.priorities() {
        debug!(session_id = %session.id(), "priorities already set, passing through");
        let text = format!("Using your priorities: {}.", priorities.describe());
        return reply(session, text);
    }

    session.set_waiting(true);
    reply(session, selection_menu())
}

/// Records the user's answer to the selection menu.
pub fn process_response(session: &mut Session, message: &str) -> String {
    let priorities = parse_ranking(message)
        .map(Priorities::Ranking)
        .or_else(|| parse_profile(message).map(Priorities::Profile));

    match priorities {
        Some(priorities) => {
            info!(session_id = %session.id(), priorities = %priorities.describe(), "priorities set");
            let text = format!("Got it, weighting the decision by {}.", priorities.describe());
            session.set_priorities(priorities);
            text
        }
        None => {
            info!(session_id = %session.id(), "no priorities recognised, keeping balanced weights");
            "Keeping a balanced weighting across all criteria.".to_string()
        }
    }
}

/// Parses `criterion=rank` pairs. Unknown criteria and out-of-range ranks
/// are skipped; at least one valid pair is needed.
pub fn parse_ranking(message: &str) -> Option<PriorityRanking> {
    let mut ranking = PriorityRanking::uniform();
    let mut matched = false;

    for caps in RANKING_ENTRY.captures_iter(message) {
        let Some(criterion) = Criterion::from_key(&caps[1]) else {
            continue;
        };
        let Ok(rank) = caps[2].parse::<u8>() else {
            continue;
        };
        if let Ok(updated) = ranking.with_rank(criterion, rank) {
            ranking = updated;
            matched = true;
        }
    }

    matched.then_some(ranking)
}

/// Parses a menu number or profile keyword.
pub fn parse_profile(message: &str) -> Option<DecisionProfile> {
    let trimmed = message.trim().trim_end_matches('.');
    match trimmed.parse::<usize>() {
        Ok(n) => DecisionProfile::from_menu_number(n),
        Err(_) => DecisionProfile::from_keyword(trimmed),
    }
}

fn selection_menu() -> String {
    let mut parts = vec![
        "## What matters most for this project?".to_string(),
        String::new(),
        "Pick a profile:".to_string(),
    ];
    parts.extend(
        DecisionProfile::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| format!("  {}. **{}** - {}", i + 1, p.label(), p.tagline())),
    );
    parts.push(String::new());
    let keys: Vec<&str> = Criterion::ALL.iter().map(|c| c.key()).collect();
    parts.push(format!(
        "Or rank each criterion from 1 to 5, e.g. `cost=5, scale=3` ({}).",
        keys.join(", ")
    ));
    parts.join("\n")
}
