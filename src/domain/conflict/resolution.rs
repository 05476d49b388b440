//! Parsing the user's choice of compromises.
//!
//! Replies look like `1-2` or `1:2, 2-1` (conflict number, compromise
//! number, both 1-based). Any number of pairs may appear in one message;
//! pairs that point outside the conflict list are ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Conflict;

static RESOLUTION_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*[-:]\s*(\d+)").expect("resolution pattern is valid"));

/// Whole-message tokens that postpone resolution.
const DEFERRAL_TOKENS: &[&str] = &["skip", "continue", "דלג", "המשך"];

/// One conflict resolved by a user reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedResolution {
    /// 0-based index into the conflict list.
    pub conflict_index: usize,
    /// 0-based index into that conflict's compromises.
    pub compromise_index: usize,
    pub compromise: String,
}

/// What a resolution reply did. Either way the reply counts as handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The user chose to move on without resolving.
    Deferred,
    /// Valid pairs that were applied, possibly none.
    Applied(Vec<AppliedResolution>),
}

impl ResolutionOutcome {
    pub fn applied_count(&self) -> usize {
        match self {
            ResolutionOutcome::Deferred => 0,
            ResolutionOutcome::Applied(applied) => applied.len(),
        }
    }
}

/// True when the trimmed, lower-cased message is exactly a deferral token.
pub fn is_deferral(message: &str) -> bool {
    let normalized = message.trim().to_lowercase();
    DEFERRAL_TOKENS.contains(&normalized.as_str())
}

/// Applies every in-range `<conflict>-<compromise>` pair in `message`.
pub fn apply_resolution(conflicts: &mut [Conflict], message: &str) -> ResolutionOutcome {
    if is_deferral(message) {
        return ResolutionOutcome::Deferred;
    }

    let mut applied = Vec::new();
    for captures in RESOLUTION_PAIR.captures_iter(message) {
        let (Ok(conflict_no), Ok(compromise_no)) =
            (captures[1].parse::<usize>(), captures[2].parse::<usize>())
        else {
            continue;
        };
        let (Some(conflict_index), Some(compromise_index)) =
            (conflict_no.checked_sub(1), compromise_no.checked_sub(1))
        else {
            continue;
        };
        let Some(conflict) = conflicts.get_mut(conflict_index) else {
            continue;
        };
        if conflict.resolve_with(compromise_index) {
            tracing::info!(
                conflict = conflict_no,
                compromise = compromise_no,
                "Conflict resolved"
            );
            applied.push(AppliedResolution {
                conflict_index,
                compromise_index,
                compromise: conflict.compromises[compromise_index].clone(),
            });
        }
    }

    ResolutionOutcome::Applied(applied)
}
