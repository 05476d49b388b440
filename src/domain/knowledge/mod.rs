//! Knowledge Base - read-only architectural pattern metadata.
//!
//! The decision matrix consults a [`PatternCatalog`] for scoring
//! coefficients; the blueprint stage uses it for pros, cons and
//! technology suggestions. The built-in catalog is [`StaticKnowledgeBase`].

mod criterion;
mod patterns;

pub use criterion::Criterion;
pub use patterns::{normalize_pattern_key, PatternProfile, StaticKnowledgeBase, TechRecommendation};

use serde::{Deserialize, Serialize};

/// Read-only lookup of pattern metadata.
///
/// Implementations must be safe for unsynchronized concurrent reads.
pub trait PatternCatalog: Send + Sync {
    /// Finds a pattern by key or display-style name.
    fn lookup_pattern(&self, name: &str) -> Option<&PatternProfile>;

    /// All pattern keys in catalog order.
    fn all_pattern_names(&self) -> Vec<&str>;

    /// Short markdown summary of a pattern.
    fn pattern_summary(&self, name: &str) -> Option<String> {
        let pattern = self.lookup_pattern(name)?;
        let best_for: Vec<&str> = pattern.best_for.iter().take(3).copied().collect();
        Some(format!(
            "**{}**\n{}\n\nBest for: {}",
            pattern.name,
            pattern.description,
            best_for.join(", ")
        ))
    }

    /// Side-by-side criterion table for the known patterns among `names`.
    ///
    /// Unknown names are skipped.
    fn compare_patterns(&self, names: &[&str]) -> PatternComparison {
        let known: Vec<&PatternProfile> = names
            .iter()
            .filter_map(|name| self.lookup_pattern(name))
            .collect();

        let mut headers = vec!["Aspect".to_string()];
        headers.extend(known.iter().map(|p| p.name.to_string()));

        let rows = Criterion::ALL
            .iter()
            .map(|criterion| {
                let mut row = vec![criterion.label().to_string()];
                row.extend(known.iter().map(|p| match p.coefficient(*criterion) {
                    Some(value) => format!("{:.0}/100", value),
                    None => "n/a".to_string(),
                }));
                row
            })
            .collect();

        PatternComparison { headers, rows }
    }
}

/// Tabular comparison of patterns across all criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternComparison {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PatternComparison {
    /// Markdown table: header row, separator, then one row per criterion.
    pub fn to_markdown(&self) -> String {
        let line = |cells: &[String]| format!("| {} |", cells.join(" | "));
        let separator = vec!["---".to_string(); self.headers.len()];

        let mut lines = vec![line(&self.headers), line(&separator)];
        lines.extend(self.rows.iter().map(|row| line(row)));
        lines.join("\n")
    }
}
