//! Merging rule-based and model-detected conflicts.

use std::collections::HashSet;

use super::Conflict;

/// Dedup key for a conflict: its explanation, trimmed and lower-cased.
pub fn normalized_explanation(conflict: &Conflict) -> String {
    conflict.explanation.trim().to_lowercase()
}

/// Rule-based conflicts first, then model conflicts with an unseen explanation.
///
/// Pure and idempotent: merging the result again with the same model
/// conflicts yields the same list. Dedup is exact-match on the normalized
/// explanation, so paraphrases are kept as distinct conflicts.
pub fn merge_conflicts(rule_based: Vec<Conflict>, model: Vec<Conflict>) -> Vec<Conflict> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(rule_based.len() + model.len());

    for conflict in rule_based.into_iter().chain(model) {
        if seen.insert(normalized_explanation(&conflict)) {
            merged.push(conflict);
        }
    }

    merged
}
