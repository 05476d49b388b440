//! Conversation nodes.
//!
//! Each node marks itself active on the session, does its work and returns
//! the reply text it appended to the transcript (if any). Nodes that ask the
//! user something also expose a response processor that the orchestrator
//! runs on the next user message.

pub mod blueprint;
pub mod conflict;
pub mod decision;
pub mod deep_dive;
pub mod intake;
pub mod priority;

use crate::config::AgentConfig;
use crate::domain::knowledge::PatternCatalog;
use crate::domain::session::{MessageRole, Session};
use crate::ports::Generator;

/// Collaborators shared by every node during one pass.
#[derive(Clone, Copy)]
pub struct NodeContext<'a> {
    pub generator: &'a dyn Generator,
    pub catalog: &'a dyn PatternCatalog,
    pub config: &'a AgentConfig,
}

/// Appends an assistant message and hands the text back as the node reply.
///
/// Text already said since the last user message is not repeated.
pub(crate) fn reply(session: &mut Session, text: String) -> Option<String> {
    let repeated = session
        .messages()
        .iter()
        .rev()
        .take_while(|m| m.role != MessageRole::User)
        .any(|m| m.content == text);
    if repeated {
        return None;
    }
    session.add_message(MessageRole::Assistant, text.clone());
    Some(text)
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    use crate::ports::{AIError, Generator, OutputSchema};

    /// Generator returning canned structured values in order, then failing.
    /// Values are checked against the requested schema like a real adapter would.
    pub struct ScriptedGenerator {
        values: Mutex<Vec<Value>>,
    }

    impl ScriptedGenerator {
        pub fn new(values: Vec<Value>) -> Self {
            Self {
                values: Mutex::new(values),
            }
        }

        pub fn failing() -> Self {
            Self::new(Vec::new())
        }
    }

    #[async_trait]
    impl Generator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str, _system_prompt: Option<&str>) -> Result<String, AIError> {
            Err(AIError::unavailable("scripted generator has no text responses"))
        }

        async fn generate_structured(
            &self,
            _prompt: &str,
            schema: &OutputSchema,
            _system_prompt: Option<&str>,
        ) -> Result<Value, AIError> {
            let mut values = self.values.lock().unwrap();
            if values.is_empty() {
                return Err(AIError::unavailable("script exhausted"));
            }
            let value = values.remove(0);
            schema.check(&value)?;
            Ok(value)
        }
    }
}
