//! Session aggregate - everything known about one advisory conversation.
//!
//! A session is created on the first user message and is never deleted
//! by the core. Nodes mutate it through the methods below; the only way
//! back to a blank state is an explicit [`Session::reset`].

use serde::{Deserialize, Serialize};

use super::{Blueprint, Constraint, Message, MessageRole, Requirement};
use crate::domain::conflict::{normalized_explanation, Conflict};
use crate::domain::conversation::{ConversationNode, Gate};
use crate::domain::decision::{resolve_weights, ArchitecturalDecision, Priorities, WeightVector};
use crate::domain::foundation::{SessionId, Timestamp};

/// Upper bound for confidence.
pub const MAX_CONFIDENCE: f64 = 1.0;

/// Session aggregate (the project context).
///
/// # Invariants
///
/// - `confidence` is in 0.0..=1.0 and never decreases except on reset
/// - `iteration` never exceeds the ceiling passed to [`Session::begin_iteration`]
/// - conflicts are only ever appended or resolved, never removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// Project name, once the intake has found one.
    project_name: Option<String>,

    /// The node that ran (or is waiting) most recently.
    current_node: ConversationNode,

    confidence: f64,

    /// Orchestrator passes so far.
    iteration: u32,

    messages: Vec<Message>,
    requirements: Vec<Requirement>,
    constraints: Vec<Constraint>,
    conflicts: Vec<Conflict>,
    priorities: Option<Priorities>,

    /// Recommendations, best first. Empty until the decision node runs.
    decisions: Vec<ArchitecturalDecision>,

    blueprint: Option<Blueprint>,

    /// Set when the last node asked the user something.
    waiting_for_user: bool,

    /// Follow-up questions still awaiting an answer.
    open_questions: Vec<String>,

    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Creates an empty session at the intake node.
    pub fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            project_name: None,
            current_node: ConversationNode::Intake,
            confidence: 0.0,
            iteration: 0,
            messages: Vec::new(),
            requirements: Vec::new(),
            constraints: Vec::new(),
            conflicts: Vec::new(),
            priorities: None,
            decisions: Vec::new(),
            blueprint: None,
            waiting_for_user: false,
            open_questions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn current_node(&self) -> ConversationNode {
        self.current_node
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The last `n` messages in order.
    pub fn recent_messages(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Conflicts that still need a compromise.
    pub fn open_conflicts(&self) -> impl Iterator<Item = (usize, &Conflict)> + '_ {
        self.conflicts.iter().enumerate().filter(|(_, c)| c.is_open())
    }

    pub fn priorities(&self) -> Option<&Priorities> {
        self.priorities.as_ref()
    }

    /// Weights the decision matrix should use for this session.
    pub fn weights(&self) -> WeightVector {
        resolve_weights(self.priorities.as_ref())
    }

    pub fn decisions(&self) -> &[ArchitecturalDecision] {
        &self.decisions
    }

    pub fn blueprint(&self) -> Option<&Blueprint> {
        self.blueprint.as_ref()
    }

    pub fn is_waiting_for_user(&self) -> bool {
        self.waiting_for_user
    }

    pub fn open_questions(&self) -> &[String] {
        &self.open_questions
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// A session is done once it holds a blueprint.
    pub fn is_done(&self) -> bool {
        self.blueprint.is_some()
    }

    /// Gate state for the given thresholds.
    pub fn gate(&self, min_confidence: f64, max_iterations: u32) -> Gate {
        Gate::new(
            self.confidence >= min_confidence,
            self.iteration >= max_iterations,
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn add_message(&mut self, role: MessageRole, content: impl Into<String>) {
        self.messages.push(Message::new(role, content));
        self.touch();
    }

    /// Marks `node` as the active node.
    pub fn enter(&mut self, node: ConversationNode) {
        self.current_node = node;
        self.touch();
    }

    pub fn set_waiting(&mut self, waiting: bool) {
        self.waiting_for_user = waiting;
        self.touch();
    }

    /// Keeps the first project name found.
    pub fn set_project_name_if_absent(&mut self, name: &str) {
        let name = name.trim();
        if self.project_name.is_none() && !name.is_empty() {
            self.project_name = Some(name.to_string());
            self.touch();
        }
    }

    /// Raises confidence to `estimate` if that is higher. Never lowers it.
    pub fn raise_confidence(&mut self, estimate: f64) {
        if estimate.is_nan() {
            return;
        }
        let estimate = estimate.clamp(0.0, MAX_CONFIDENCE);
        if estimate > self.confidence {
            self.confidence = estimate;
            self.touch();
        }
    }

    /// Adds `step`, capped at `cap`, without ever lowering confidence.
    pub fn bump_confidence(&mut self, step: f64, cap: f64) {
        self.raise_confidence((self.confidence + step).min(cap));
    }

    /// Counts one orchestrator pass, saturating at `ceiling`.
    pub fn begin_iteration(&mut self, ceiling: u32) {
        self.iteration = self.iteration.saturating_add(1).min(ceiling);
        self.touch();
    }

    /// Appends requirements whose description is not already recorded.
    ///
    /// Returns how many were added.
    pub fn add_requirements(&mut self, requirements: impl IntoIterator<Item = Requirement>) -> usize {
        let mut added = 0;
        for requirement in requirements {
            let key = requirement.description.trim().to_lowercase();
            if key.is_empty()
                || self
                    .requirements
                    .iter()
                    .any(|r| r.description.trim().to_lowercase() == key)
            {
                continue;
            }
            self.requirements.push(requirement);
            added += 1;
        }
        if added > 0 {
            self.touch();
        }
        added
    }

    /// Appends constraints not already recorded (same type and description).
    ///
    /// Returns how many were added.
    pub fn add_constraints(&mut self, constraints: impl IntoIterator<Item = Constraint>) -> usize {
        let mut added = 0;
        for constraint in constraints {
            let duplicate = self.constraints.iter().any(|c| {
                c.constraint_type == constraint.constraint_type
                    && c.description.trim().eq_ignore_ascii_case(constraint.description.trim())
            });
            if duplicate {
                continue;
            }
            self.constraints.push(constraint);
            added += 1;
        }
        if added > 0 {
            self.touch();
        }
        added
    }

    /// Replaces any previous priorities.
    pub fn set_priorities(&mut self, priorities: Priorities) {
        self.priorities = Some(priorities);
        self.touch();
    }

    /// Appends conflicts whose explanation is not yet recorded.
    ///
    /// Existing conflicts, including their resolution state, are kept.
    /// Returns the number of new unresolved conflicts.
    pub fn absorb_conflicts(&mut self, incoming: Vec<Conflict>) -> usize {
        let mut added = 0;
        for conflict in incoming {
            let key = normalized_explanation(&conflict);
            if self
                .conflicts
                .iter()
                .any(|existing| normalized_explanation(existing) == key)
            {
                continue;
            }
            if conflict.is_open() {
                added += 1;
            }
            self.conflicts.push(conflict);
        }
        self.touch();
        added
    }

    /// Mutable view for resolution. The slice cannot grow or shrink.
    pub fn conflicts_mut(&mut self) -> &mut [Conflict] {
        self.updated_at = Timestamp::now();
        &mut self.conflicts
    }

    pub fn set_open_questions(&mut self, questions: Vec<String>) {
        self.open_questions = questions;
        self.touch();
    }

    pub fn record_decisions(&mut self, decisions: Vec<ArchitecturalDecision>) {
        self.decisions = decisions;
        self.touch();
    }

    pub fn set_blueprint(&mut self, blueprint: Blueprint) {
        self.blueprint = Some(blueprint);
        self.touch();
    }

    /// Explicit restart: back to intake with nothing collected.
    ///
    /// The transcript is kept so the conversation history stays intact.
    pub fn reset(&mut self) {
        self.project_name = None;
        self.current_node = ConversationNode::Intake;
        self.confidence = 0.0;
        self.iteration = 0;
        self.requirements.clear();
        self.constraints.clear();
        self.conflicts.clear();
        self.priorities = None;
        self.decisions.clear();
        self.blueprint = None;
        self.waiting_for_user = false;
        self.open_questions.clear();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
