//! Conversation Orchestrator - drives one user turn through the node graph.
//!
//! A turn is one pass: record the user message, let the waiting node digest
//! it, then step through nodes until one waits for the user, the session is
//! done, or the per-turn step budget runs out. Every conflict/deep-dive
//! cycle counts as an iteration, so the iteration ceiling bounds the loop.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::nodes::{self, NodeContext};
use crate::config::AgentConfig;
use crate::domain::conversation::{ConversationNode, Gate};
use crate::domain::foundation::StateMachine;
use crate::domain::knowledge::PatternCatalog;
use crate::domain::session::{MessageRole, Session};
use crate::ports::Generator;

/// Node executions allowed within one turn.
pub const MAX_STEPS_PER_TURN: usize = 16;

const RESET_COMMANDS: &[&str] = &["reset", "start over"];

const RESET_REPLY: &str = "Starting over. Describe the project you want an architecture for.";

/// What a single turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// Node replies of this turn, joined by blank lines.
    pub reply: String,
    /// Node active when the turn ended.
    pub node: ConversationNode,
    pub waiting_for_user: bool,
    pub done: bool,
}

impl TurnOutcome {
    fn from_session(session: &Session, replies: Vec<String>) -> Self {
        Self {
            reply: replies.join("\n\n"),
            node: session.current_node(),
            waiting_for_user: session.is_waiting_for_user(),
            done: session.is_done(),
        }
    }
}

/// True for the explicit restart commands, ignoring case and surrounding space.
pub fn is_reset_command(message: &str) -> bool {
    let normalized = message.trim().to_lowercase();
    RESET_COMMANDS.contains(&normalized.as_str())
}

/// Drives sessions through the conversation graph.
pub struct ConversationOrchestrator {
    generator: Arc<dyn Generator>,
    catalog: Arc<dyn PatternCatalog>,
    config: AgentConfig,
}

impl ConversationOrchestrator {
    pub fn new(
        generator: Arc<dyn Generator>,
        catalog: Arc<dyn PatternCatalog>,
        config: AgentConfig,
    ) -> Self {
        Self {
            generator,
            catalog,
            config,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Processes one user message against `session`.
    ///
    /// Never fails: generation problems degrade inside the nodes.
    pub async fn handle_message(&self, session: &mut Session, message: &str) -> TurnOutcome {
        session.add_message(MessageRole::User, message);

        if is_reset_command(message) {
            return self.reset(session);
        }

        if let Some(blueprint) = session.blueprint() {
            let text = format!(
                "The recommendation is final: **{}**. Send `reset` to start a new analysis.",
                blueprint.pattern_name
            );
            session.add_message(MessageRole::Assistant, text.clone());
            return TurnOutcome::from_session(session, vec![text]);
        }

        session.begin_iteration(self.config.max_iterations);
        let mut replies = Vec::new();

        let start = if session.is_waiting_for_user() {
            let waiting = session.current_node();
            if let Some(ack) = self.process_response(waiting, session, message) {
                replies.push(ack);
            }
            session.set_waiting(false);
            waiting.resume(self.gate(session))
        } else {
            session.current_node()
        };
        debug!(session_id = %session.id(), node = %start, iteration = session.iteration(), "turn started");

        self.step_from(start, session, &mut replies).await;
        TurnOutcome::from_session(session, replies)
    }

    /// Explicit restart. The transcript is kept; everything collected is cleared.
    pub fn reset(&self, session: &mut Session) -> TurnOutcome {
        info!(session_id = %session.id(), "session reset");
        session.reset();
        session.set_waiting(true);
        session.add_message(MessageRole::Assistant, RESET_REPLY);
        TurnOutcome::from_session(session, vec![RESET_REPLY.to_string()])
    }

    async fn step_from(&self, start: ConversationNode, session: &mut Session, replies: &mut Vec<String>) {
        let mut node = start;

        for _ in 0..MAX_STEPS_PER_TURN {
            if let Some(text) = self.run_node(node, session).await {
                replies.push(text);
            }
            if session.is_waiting_for_user() || session.is_done() {
                return;
            }

            let Some(next) = node.next(self.gate(session)) else {
                return;
            };
            match node.transition_to(next) {
                Ok(next) => {
                    // Looping back from the deep dive starts another full cycle.
                    if node == ConversationNode::DeepDive && next == ConversationNode::Conflict {
                        session.begin_iteration(self.config.max_iterations);
                        debug!(session_id = %session.id(), iteration = session.iteration(), "cycle restarted within turn");
                    }
                    node = next;
                }
                Err(e) => {
                    warn!(session_id = %session.id(), error = %e, "rejected node transition");
                    return;
                }
            }
        }

        warn!(session_id = %session.id(), node = %node, "step budget exhausted for this turn");
        session.enter(node);
    }

    async fn run_node(&self, node: ConversationNode, session: &mut Session) -> Option<String> {
        let ctx = self.context();
        match node {
            ConversationNode::Intake => nodes::intake::run(ctx, session).await,
            ConversationNode::Priority => nodes::priority::run(session),
            ConversationNode::Conflict => nodes::conflict::run(ctx, session).await,
            ConversationNode::DeepDive => nodes::deep_dive::run(ctx, session).await,
            ConversationNode::Decision => nodes::decision::run(ctx, session),
            ConversationNode::Blueprint => nodes::blueprint::run(ctx, session).await,
        }
    }

    /// Runs the waiting node's response processor. Returns an acknowledgment
    /// when the processor has something to say.
    fn process_response(
        &self,
        node: ConversationNode,
        session: &mut Session,
        message: &str,
    ) -> Option<String> {
        let ack = match node {
            ConversationNode::Priority => nodes::priority::process_response(session, message),
            ConversationNode::Conflict => nodes::conflict::process_response(session, message),
            // Deep-dive answers are already in the transcript; intake reads the new description.
            _ => return None,
        };
        session.add_message(MessageRole::Assistant, ack.clone());
        Some(ack)
    }

    fn context(&self) -> NodeContext<'_> {
        NodeContext {
            generator: self.generator.as_ref(),
            catalog: self.catalog.as_ref(),
            config: &self.config,
        }
    }

    fn gate(&self, session: &Session) -> Gate {
        session.gate(self.config.min_confidence, self.config.max_iterations)
    }
}
