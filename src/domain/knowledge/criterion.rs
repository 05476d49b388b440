//! Decision criteria that every architectural pattern is rated on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One axis of the decision matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    TimeToMarket,
    Cost,
    Scale,
    Reliability,
    Security,
}

impl Criterion {
    /// All criteria in canonical order. Breakdown and weight vectors follow it.
    pub const ALL: [Criterion; 5] = [
        Criterion::TimeToMarket,
        Criterion::Cost,
        Criterion::Scale,
        Criterion::Reliability,
        Criterion::Security,
    ];

    /// Position in [`Criterion::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Criterion::TimeToMarket => 0,
            Criterion::Cost => 1,
            Criterion::Scale => 2,
            Criterion::Reliability => 3,
            Criterion::Security => 4,
        }
    }

    /// Snake-case key, as used in prompts and user commands.
    pub fn key(&self) -> &'static str {
        match self {
            Criterion::TimeToMarket => "time_to_market",
            Criterion::Cost => "cost",
            Criterion::Scale => "scale",
            Criterion::Reliability => "reliability",
            Criterion::Security => "security",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Criterion::TimeToMarket => "Time to Market",
            Criterion::Cost => "Cost",
            Criterion::Scale => "Scalability",
            Criterion::Reliability => "Reliability",
            Criterion::Security => "Security",
        }
    }

    /// Parses a criterion from a user-typed key. Accepts a few short aliases.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "time_to_market" | "ttm" | "speed" | "time" => Some(Criterion::TimeToMarket),
            "cost" | "budget" => Some(Criterion::Cost),
            "scale" | "scalability" => Some(Criterion::Scale),
            "reliability" | "availability" => Some(Criterion::Reliability),
            "security" => Some(Criterion::Security),
            _ => None,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_position_in_all() {
        for (i, c) in Criterion::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn from_key_round_trips_canonical_keys() {
        for c in Criterion::ALL {
            assert_eq!(Criterion::from_key(c.key()), Some(c));
        }
    }

    #[test]
    fn from_key_accepts_aliases_and_spacing() {
        assert_eq!(Criterion::from_key("Time to market"), Some(Criterion::TimeToMarket));
        assert_eq!(Criterion::from_key("scalability"), Some(Criterion::Scale));
        assert_eq!(Criterion::from_key("uptime"), None);
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&Criterion::TimeToMarket).unwrap();
        assert_eq!(json, "\"time_to_market\"");
    }
}
