//! Conversation nodes and the transition table between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// A stage of the advisory conversation.
///
/// Flow: `Intake` → `Priority` → `Conflict` ⇄ `DeepDive` → `Decision` → `Blueprint`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationNode {
    /// Extract requirements and constraints from the project description.
    #[default]
    Intake,
    /// Establish what the user cares about most.
    Priority,
    /// Surface tensions between requirements and constraints.
    Conflict,
    /// Ask follow-up questions until confident enough to decide.
    DeepDive,
    /// Score patterns and record the recommendations.
    Decision,
    /// Produce the final blueprint.
    Blueprint,
}

/// Inputs to the information-gathering gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gate {
    /// Confidence has reached the minimum.
    pub confident: bool,
    /// The iteration ceiling has been hit.
    pub ceiling_reached: bool,
}

impl Gate {
    pub fn new(confident: bool, ceiling_reached: bool) -> Self {
        Self {
            confident,
            ceiling_reached,
        }
    }

    /// True when the session may leave information gathering.
    pub fn is_open(&self) -> bool {
        self.confident || self.ceiling_reached
    }
}

impl ConversationNode {
    pub const ALL: [ConversationNode; 6] = [
        ConversationNode::Intake,
        ConversationNode::Priority,
        ConversationNode::Conflict,
        ConversationNode::DeepDive,
        ConversationNode::Decision,
        ConversationNode::Blueprint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Priority => "priority",
            Self::Conflict => "conflict",
            Self::DeepDive => "deep_dive",
            Self::Decision => "decision",
            Self::Blueprint => "blueprint",
        }
    }

    /// Successor after this node ran without waiting. `None` once terminal.
    pub fn next(&self, gate: Gate) -> Option<Self> {
        match self {
            Self::Intake => Some(Self::Priority),
            Self::Priority => Some(Self::Conflict),
            Self::Conflict if gate.is_open() => Some(Self::Decision),
            Self::Conflict => Some(Self::DeepDive),
            Self::DeepDive => Some(Self::Conflict),
            Self::Decision => Some(Self::Blueprint),
            Self::Blueprint => None,
        }
    }

    /// Node to run after the user answered a question this node asked.
    pub fn resume(&self, gate: Gate) -> Self {
        match self {
            Self::Priority => Self::Conflict,
            Self::Conflict if gate.is_open() => Self::Decision,
            Self::Conflict => Self::DeepDive,
            Self::DeepDive if gate.ceiling_reached => Self::Decision,
            other => *other,
        }
    }
}

impl StateMachine for ConversationNode {
    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationNode::*;
        match self {
            Intake => vec![Priority],
            Priority => vec![Conflict],
            Conflict => vec![DeepDive, Decision],
            DeepDive => vec![Conflict, DeepDive, Decision],
            Decision => vec![Blueprint],
            Blueprint => vec![],
        }
    }
}

impl fmt::Display for ConversationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
