//! User priorities and the weight vectors they resolve to.
//!
//! A session holds at most one of a [`PriorityRanking`] or a
//! [`DecisionProfile`]. Scoring resolves whichever is present into a
//! [`WeightVector`] exactly once per call.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;
use crate::domain::knowledge::Criterion;

/// Lowest accepted importance rank.
pub const MIN_RANK: u8 = 1;

/// Highest accepted importance rank.
pub const MAX_RANK: u8 = 5;

/// Rank assumed for criteria the user did not mention.
pub const DEFAULT_RANK: u8 = 3;

/// Normalized per-criterion weights, indexed by [`Criterion::index`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightVector([f64; 5]);

impl WeightVector {
    /// Equal weight for every criterion.
    pub fn balanced() -> Self {
        Self([0.2; 5])
    }

    pub fn from_array(weights: [f64; 5]) -> Self {
        Self(weights)
    }

    pub fn weight(&self, criterion: Criterion) -> f64 {
        self.0[criterion.index()]
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Criteria paired with their weights in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        Criterion::ALL.iter().map(move |c| (*c, self.0[c.index()]))
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::balanced()
    }
}

/// Preset weightings a user can pick instead of ranking criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionProfile {
    MvpFast,
    CostFirst,
    ScaleFirst,
    SecurityFirst,
}

impl DecisionProfile {
    pub const ALL: [DecisionProfile; 4] = [
        DecisionProfile::MvpFast,
        DecisionProfile::CostFirst,
        DecisionProfile::ScaleFirst,
        DecisionProfile::SecurityFirst,
    ];

    /// Fixed weights in (ttm, cost, scale, reliability, security) order.
    pub fn weights(&self) -> WeightVector {
        WeightVector(match self {
            DecisionProfile::MvpFast => [0.40, 0.25, 0.10, 0.15, 0.10],
            DecisionProfile::CostFirst => [0.15, 0.40, 0.15, 0.15, 0.15],
            DecisionProfile::ScaleFirst => [0.10, 0.15, 0.40, 0.20, 0.15],
            DecisionProfile::SecurityFirst => [0.10, 0.10, 0.15, 0.25, 0.40],
        })
    }

    pub fn key(&self) -> &'static str {
        match self {
            DecisionProfile::MvpFast => "mvp_fast",
            DecisionProfile::CostFirst => "cost_first",
            DecisionProfile::ScaleFirst => "scale_first",
            DecisionProfile::SecurityFirst => "security_first",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DecisionProfile::MvpFast => "MVP Fast",
            DecisionProfile::CostFirst => "Cost First",
            DecisionProfile::ScaleFirst => "Scale First",
            DecisionProfile::SecurityFirst => "Security First",
        }
    }

    /// One-line description shown in the selection menu.
    pub fn tagline(&self) -> &'static str {
        match self {
            DecisionProfile::MvpFast => "ship quickly, keep costs reasonable",
            DecisionProfile::CostFirst => "minimize infrastructure and operating cost",
            DecisionProfile::ScaleFirst => "prepare for large growth and load",
            DecisionProfile::SecurityFirst => "compliance and data protection come first",
        }
    }

    /// Menu position, 1-based.
    pub fn from_menu_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Matches the first profile whose key or keyword appears in `text`.
    pub fn from_keyword(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        let matches = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        if matches(&["mvp_fast", "mvp", "fast", "speed", "quick"]) {
            Some(DecisionProfile::MvpFast)
        } else if matches(&["cost_first", "cost", "cheap", "budget"]) {
            Some(DecisionProfile::CostFirst)
        } else if matches(&["scale_first", "scale", "growth"]) {
            Some(DecisionProfile::ScaleFirst)
        } else if matches(&["security_first", "security", "secure", "compliance"]) {
            Some(DecisionProfile::SecurityFirst)
        } else {
            None
        }
    }
}

impl fmt::Display for DecisionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Importance of each criterion on a 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRanking {
    pub time_to_market: u8,
    pub cost: u8,
    pub scale: u8,
    pub reliability: u8,
    pub security: u8,
}

impl PriorityRanking {
    /// Builds a ranking from ranks in canonical criterion order.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for any rank outside 1-5.
    pub fn new(ranks: [u8; 5]) -> Result<Self, ValidationError> {
        for (criterion, rank) in Criterion::ALL.iter().zip(ranks) {
            if !(MIN_RANK..=MAX_RANK).contains(&rank) {
                return Err(ValidationError::out_of_range(
                    criterion.key(),
                    MIN_RANK as i32,
                    MAX_RANK as i32,
                    rank as i32,
                ));
            }
        }
        let [time_to_market, cost, scale, reliability, security] = ranks;
        Ok(Self {
            time_to_market,
            cost,
            scale,
            reliability,
            security,
        })
    }

    /// Every criterion at the default rank.
    pub fn uniform() -> Self {
        Self {
            time_to_market: DEFAULT_RANK,
            cost: DEFAULT_RANK,
            scale: DEFAULT_RANK,
            reliability: DEFAULT_RANK,
            security: DEFAULT_RANK,
        }
    }

    pub fn rank(&self, criterion: Criterion) -> u8 {
        match criterion {
            Criterion::TimeToMarket => self.time_to_market,
            Criterion::Cost => self.cost,
            Criterion::Scale => self.scale,
            Criterion::Reliability => self.reliability,
            Criterion::Security => self.security,
        }
    }

    /// Returns a copy with one criterion re-ranked.
    pub fn with_rank(mut self, criterion: Criterion, rank: u8) -> Result<Self, ValidationError> {
        if !(MIN_RANK..=MAX_RANK).contains(&rank) {
            return Err(ValidationError::out_of_range(
                criterion.key(),
                MIN_RANK as i32,
                MAX_RANK as i32,
                rank as i32,
            ));
        }
        match criterion {
            Criterion::TimeToMarket => self.time_to_market = rank,
            Criterion::Cost => self.cost = rank,
            Criterion::Scale => self.scale = rank,
            Criterion::Reliability => self.reliability = rank,
            Criterion::Security => self.security = rank,
        }
        Ok(self)
    }

    /// Ranks divided by their sum. An all-zero ranking (only reachable
    /// through deserialization) falls back to balanced weights.
    pub fn to_weights(&self) -> WeightVector {
        let total: f64 = Criterion::ALL.iter().map(|c| self.rank(*c) as f64).sum();
        if total <= 0.0 {
            return WeightVector::balanced();
        }
        let mut weights = [0.0; 5];
        for criterion in Criterion::ALL {
            weights[criterion.index()] = self.rank(criterion) as f64 / total;
        }
        WeightVector(weights)
    }
}

/// What the user told us matters most. Setting one form replaces the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Priorities {
    Ranking(PriorityRanking),
    Profile(DecisionProfile),
}

impl Priorities {
    pub fn weights(&self) -> WeightVector {
        match self {
            Priorities::Ranking(ranking) => ranking.to_weights(),
            Priorities::Profile(profile) => profile.weights(),
        }
    }

    /// Short human description for replies and digests.
    pub fn describe(&self) -> String {
        match self {
            Priorities::Profile(profile) => format!("profile {}", profile.label()),
            Priorities::Ranking(ranking) => {
                let parts: Vec<String> = Criterion::ALL
                    .iter()
                    .map(|c| format!("{}={}", c.key(), ranking.rank(*c)))
                    .collect();
                format!("ranking {}", parts.join(", "))
            }
        }
    }
}

/// Resolves optional priorities to weights; absent means balanced.
pub fn resolve_weights(priorities: Option<&Priorities>) -> WeightVector {
    priorities.map(Priorities::weights).unwrap_or_default()
}
